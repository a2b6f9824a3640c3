use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use jotter_core::actions::NoteActions;
use jotter_core::api::NotesApiClient;
use jotter_core::config::ClientConfig;
use jotter_core::pagination::PageView;
use jotter_core::preferences::{
    FilePreferenceRepository, MemoryPreferenceRepository, PreferenceRepository,
};
use jotter_core::state::AppState;
use jotter_core::theme::{DarkMode, RootClassList, TerminalPalette};
use jotter_core::toast::{Toast, ToastKind};
use jotter_core::{Note, NoteId};

use crate::cli::Cli;
use crate::error::CliError;

const TITLE_WIDTH: usize = 28;
const PREVIEW_WIDTH: usize = 40;

/// Everything a command needs: state and the backend client.
pub struct AppContext {
    pub actions: NoteActions<NotesApiClient>,
    pub preferences_path: Option<PathBuf>,
    pub color: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut config = ClientConfig::load(cli.config.as_deref())?;
        if let Some(api_url) = cli.api_url.as_deref() {
            config.api_base_url = api_url.to_string();
        }
        let client = NotesApiClient::new(config.api_base_url.clone())?;

        let preferences_path = config.resolved_preferences_path();
        let repo: Arc<dyn PreferenceRepository> = match &preferences_path {
            Some(path) => Arc::new(FilePreferenceRepository::new(path)),
            None => {
                tracing::warn!("No config directory; preferences will not persist");
                Arc::new(MemoryPreferenceRepository::new())
            }
        };
        let dark_mode = DarkMode::load(repo, Arc::new(RootClassList::new()));
        let state = AppState::new(config.page_size, dark_mode);

        tracing::debug!(api = %client.base_url(), "Client configured");
        Ok(Self {
            actions: NoteActions::new(client, state),
            preferences_path,
            color: !cli.no_color,
        })
    }

    pub const fn state(&self) -> &AppState {
        self.actions.state()
    }

    pub fn palette(&self) -> Option<&'static TerminalPalette> {
        self.color.then(|| self.state().dark_mode.theme().palette())
    }

    /// Print toasts raised during the command to stderr.
    pub fn flush_toasts(&self) {
        let palette = self.palette();
        for toast in self.state().toasts.current() {
            eprintln!("{}", format_toast(&toast, palette));
            self.state().toasts.remove(&toast.id);
        }
    }
}

pub fn format_toast(toast: &Toast, palette: Option<&TerminalPalette>) -> String {
    let label = format!("[{}]", toast.kind);
    let label = match palette {
        Some(palette) => {
            let style = match toast.kind {
                ToastKind::Success => palette.success,
                ToastKind::Error => palette.error,
                ToastKind::Info => palette.accent,
            };
            palette.paint(style, &label)
        }
        None => label,
    };
    format!("{label} {}", toast.message)
}

pub fn normalize_content(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub fn normalize_note_identifier(value: &str) -> Result<NoteId, CliError> {
    let value = value.trim();
    if value.is_empty() {
        Err(CliError::EmptyNoteId)
    } else {
        Ok(NoteId::new(value))
    }
}

/// Title for a note created without `--title`: its first line, shortened.
pub fn derive_title(content: &str) -> String {
    let probe = Note {
        id: NoteId::new(""),
        title: String::new(),
        content: content.to_string(),
        created_at: None,
    };
    probe.preview(60)
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let delta_seconds = (now_ms - timestamp_ms).max(0) / 1000;

    if delta_seconds < 60 {
        "just now".to_string()
    } else if delta_seconds < 60 * 60 {
        format!("{}m ago", delta_seconds / 60)
    } else if delta_seconds < 60 * 60 * 24 {
        format!("{}h ago", delta_seconds / (60 * 60))
    } else {
        format!("{}d ago", delta_seconds / (60 * 60 * 24))
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let mut truncated = value
            .chars()
            .take(max_chars.saturating_sub(3))
            .collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_note_line(note: &Note, now_ms: i64, palette: Option<&TerminalPalette>) -> String {
    let id = note.id.to_string();
    let title = truncate(note.title.trim(), TITLE_WIDTH);
    let preview = note.preview(PREVIEW_WIDTH);
    let created = note
        .created_at
        .as_ref()
        .and_then(jotter_core::models::Timestamp::to_datetime)
        .map(|created| format_relative_time(created.timestamp_millis(), now_ms))
        .unwrap_or_default();

    let line = format!("{title:<TITLE_WIDTH$}  {preview:<PREVIEW_WIDTH$}  {created}");
    match palette {
        Some(palette) => format!(
            "{}  {}",
            palette.paint(palette.accent, &format!("{id:>6}")),
            line.trim_end()
        ),
        None => format!("{id:>6}  {}", line.trim_end()),
    }
}

/// One line per note, then the "Showing X–Y of Z" footer and page hints.
pub fn format_page_lines(view: &PageView, palette: Option<&TerminalPalette>) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    let mut lines = view
        .notes
        .iter()
        .map(|note| format_note_line(note, now_ms, palette))
        .collect::<Vec<_>>();

    let mut footer = view.summary();
    if view.total_pages > 0 {
        footer.push_str(&format!(
            " (page {} of {})",
            view.current_page, view.total_pages
        ));
    }
    if view.has_prev_page {
        footer.push_str(&format!("  prev: --page {}", view.current_page - 1));
    }
    if view.has_next_page {
        footer.push_str(&format!("  next: --page {}", view.current_page + 1));
    }
    lines.push(match palette {
        Some(palette) => palette.paint(palette.muted, &footer),
        None => footer,
    });
    lines
}
