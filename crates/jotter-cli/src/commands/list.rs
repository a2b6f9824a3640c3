use crate::commands::common::{format_page_lines, AppContext};
use crate::error::CliError;

pub async fn run_list(
    ctx: &AppContext,
    search: Option<&str>,
    page: usize,
    per_page: Option<usize>,
    as_json: bool,
) -> Result<(), CliError> {
    if page == 0 {
        return Err(CliError::InvalidPage);
    }
    let state = ctx.state();
    if let Some(per_page) = per_page {
        state.set_page_size(per_page)?;
    }

    ctx.actions
        .search(search.map(str::trim).unwrap_or_default())
        .await?;
    state.go_to_page(page);

    let view = state.page_view();
    if as_json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        for line in format_page_lines(&view, ctx.palette()) {
            println!("{line}");
        }
    }

    Ok(())
}
