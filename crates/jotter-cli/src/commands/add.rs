use jotter_core::CreateNoteRequest;

use crate::commands::common::{derive_title, normalize_content, AppContext};
use crate::error::CliError;

pub async fn run_add(
    ctx: &AppContext,
    title: Option<&str>,
    content: &[String],
) -> Result<(), CliError> {
    let content = normalize_content(&content.join(" ")).ok_or(CliError::EmptyContent)?;
    let title = title
        .and_then(normalize_content)
        .unwrap_or_else(|| derive_title(&content));

    let note = ctx
        .actions
        .create(CreateNoteRequest { title, content })
        .await?;
    println!("Created note {}", note.id);
    Ok(())
}
