//! Derived pagination view over the note collection.

use std::num::NonZeroUsize;

use serde::Serialize;

use crate::models::{filter_notes, Note};

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(20) {
    Some(size) => size,
    None => unreachable!(),
};

/// One page of the filtered collection plus display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    /// Notes on the current page
    pub notes: Vec<Note>,
    /// Number of notes after filtering
    pub total_notes: usize,
    pub total_pages: usize,
    /// Echo of the requested page, never corrected
    pub current_page: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    /// 1-based position of the first note on the page
    pub start_index: usize,
    /// 1-based position of the last note on the page, clamped to the total
    pub end_index: usize,
}

impl PageView {
    /// Human-readable "Showing X–Y of Z" line.
    pub fn summary(&self) -> String {
        if self.notes.is_empty() {
            format!("Showing 0 of {}", self.total_notes)
        } else {
            format!(
                "Showing {}–{} of {}",
                self.start_index, self.end_index, self.total_notes
            )
        }
    }
}

/// Filter `notes` by `query` and cut out page `current_page`.
///
/// A page past the end yields an empty slice; callers recover by resetting
/// to page 1. Page 0 is treated like a page before the start and is empty too.
pub fn paginate(
    notes: &[Note],
    query: &str,
    current_page: usize,
    page_size: NonZeroUsize,
) -> PageView {
    let filtered = filter_notes(notes, query);
    let page_size = page_size.get();

    let total_notes = filtered.len();
    let total_pages = total_notes.div_ceil(page_size);
    let start = current_page.saturating_sub(1).saturating_mul(page_size);
    let end = start.saturating_add(page_size);

    let page = if current_page == 0 {
        Vec::new()
    } else {
        filtered
            .get(start.min(total_notes)..end.min(total_notes))
            .map(<[Note]>::to_vec)
            .unwrap_or_default()
    };

    PageView {
        notes: page,
        total_notes,
        total_pages,
        current_page,
        has_next_page: current_page < total_pages,
        has_prev_page: current_page > 1,
        start_index: start.saturating_add(1),
        end_index: end.min(total_notes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteId;
    use pretty_assertions::assert_eq;

    fn numbered(count: usize) -> Vec<Note> {
        (1..=count)
            .map(|n| Note {
                id: NoteId::new(n.to_string()),
                title: format!("Note {n}"),
                content: format!("Body of note {n}"),
                created_at: None,
            })
            .collect()
    }

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn titles(view: &PageView) -> Vec<String> {
        view.notes.iter().map(|n| n.title.clone()).collect()
    }

    #[test]
    fn first_page_of_twenty_five() {
        let view = paginate(&numbered(25), "", 1, size(20));

        assert_eq!(view.notes.len(), 20);
        assert_eq!(view.notes[0].title, "Note 1");
        assert_eq!(view.notes[19].title, "Note 20");
        assert_eq!(view.total_notes, 25);
        assert_eq!(view.total_pages, 2);
        assert!(view.has_next_page);
        assert!(!view.has_prev_page);
        assert_eq!(view.start_index, 1);
        assert_eq!(view.end_index, 20);
        assert_eq!(view.summary(), "Showing 1–20 of 25");
    }

    #[test]
    fn second_page_of_twenty_five() {
        let view = paginate(&numbered(25), "", 2, size(20));

        assert_eq!(
            titles(&view),
            vec!["Note 21", "Note 22", "Note 23", "Note 24", "Note 25"]
        );
        assert!(!view.has_next_page);
        assert!(view.has_prev_page);
        assert_eq!(view.start_index, 21);
        assert_eq!(view.end_index, 25);
    }

    #[test]
    fn page_past_end_is_empty_and_not_corrected() {
        let view = paginate(&numbered(5), "", 3, size(20));

        assert!(view.notes.is_empty());
        assert_eq!(view.current_page, 3);
        assert_eq!(view.total_pages, 1);
        assert!(!view.has_next_page);
        assert!(view.has_prev_page);
        assert_eq!(view.start_index, 41);
        assert_eq!(view.end_index, 5);
    }

    #[test]
    fn search_narrows_before_paging() {
        let view = paginate(&numbered(25), "note 2", 1, size(3));

        // "Note 2" and "Note 20".."Note 25"
        assert_eq!(view.total_notes, 7);
        assert_eq!(view.total_pages, 3);
        assert_eq!(titles(&view), vec!["Note 2", "Note 20", "Note 21"]);
    }

    #[test]
    fn empty_collection() {
        let view = paginate(&[], "", 1, size(20));

        assert_eq!(view.total_pages, 0);
        assert!(!view.has_next_page);
        assert!(!view.has_prev_page);
        assert_eq!(view.end_index, 0);
        assert_eq!(view.summary(), "Showing 0 of 0");
    }

    #[test]
    fn slice_length_matches_formula() {
        let notes = numbered(23);
        for page_size in 1..=25 {
            for page in 1..=30 {
                let view = paginate(&notes, "", page, size(page_size));
                let start = (page - 1) * page_size;
                let expected = page_size.min(notes.len().saturating_sub(start));
                assert_eq!(view.notes.len(), expected, "page {page} size {page_size}");
                assert_eq!(
                    view.has_next_page,
                    page < notes.len().div_ceil(page_size),
                    "page {page} size {page_size}"
                );
                assert_eq!(view.has_prev_page, page > 1);
            }
        }
    }

    #[test]
    fn page_zero_is_empty() {
        let view = paginate(&numbered(3), "", 0, size(2));
        assert!(view.notes.is_empty());
        assert!(!view.has_prev_page);
        assert!(view.has_next_page);
    }
}
