use crate::commands::common::{normalize_note_identifier, AppContext};
use crate::error::CliError;

pub async fn run_delete(ctx: &AppContext, id: &str) -> Result<(), CliError> {
    let id = normalize_note_identifier(id)?;
    ctx.actions.delete(&id).await?;
    println!("Deleted note {id}");
    Ok(())
}
