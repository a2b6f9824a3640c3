use jotter_core::UpdateNoteRequest;

use crate::commands::common::{normalize_content, normalize_note_identifier, AppContext};
use crate::error::CliError;

/// Update a note. Fields not given keep the value the backend currently has.
pub async fn run_edit(
    ctx: &AppContext,
    id: &str,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<(), CliError> {
    let id = normalize_note_identifier(id)?;
    if title.is_none() && content.is_none() {
        return Err(CliError::NothingToEdit);
    }

    let mut request = match (title, content) {
        (Some(title), Some(content)) => UpdateNoteRequest {
            title: title.trim().to_string(),
            content: content.to_string(),
        },
        _ => {
            ctx.actions.refresh().await?;
            let existing = ctx
                .state()
                .notes()
                .into_iter()
                .find(|note| note.id == id)
                .ok_or_else(|| CliError::NoteNotFound(id.to_string()))?;
            UpdateNoteRequest::from(&existing)
        }
    };
    if let Some(title) = title {
        request.title = title.trim().to_string();
    }
    if let Some(content) = content {
        request.content = normalize_content(content).ok_or(CliError::EmptyContent)?;
    }

    let note = ctx.actions.update(&id, request).await?;
    println!("Updated note {}", note.id);
    Ok(())
}
