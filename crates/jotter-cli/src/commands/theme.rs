use crate::cli::ThemeArg;
use crate::commands::common::AppContext;
use crate::error::CliError;

pub fn run_theme(ctx: &AppContext, mode: Option<ThemeArg>) -> Result<(), CliError> {
    let dark_mode = &ctx.state().dark_mode;
    match mode {
        Some(ThemeArg::On) => dark_mode.set(true)?,
        Some(ThemeArg::Off) => dark_mode.set(false)?,
        Some(ThemeArg::Toggle) => {
            dark_mode.toggle()?;
        }
        None => {}
    }

    println!("Dark mode: {}", if dark_mode.get() { "on" } else { "off" });
    if mode.is_some() {
        match &ctx.preferences_path {
            Some(path) => println!("Saved to {}", path.display()),
            None => println!("Not persisted (no config directory)"),
        }
    }
    Ok(())
}
