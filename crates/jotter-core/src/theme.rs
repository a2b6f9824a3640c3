//! Dark-mode preference and its presentation side effects.
//!
//! The persisted flag, the in-memory flag and the root `dark` class move
//! together: every mutation persists first, then flips the class, then
//! updates memory.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::Result;
use crate::preferences::{MemoryPreferenceRepository, PreferenceRepository};
use crate::state::Observable;

/// Storage key of the dark-mode flag.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Class applied to the presentation root while dark mode is on.
pub const DARK_CLASS: &str = "dark";

/// Something with a root class list the UI layer renders from.
pub trait PresentationToggle: Send + Sync {
    fn set_class(&self, class: &str, enabled: bool);
}

/// Observable in-memory class list for the presentation root.
#[derive(Debug, Clone, Default)]
pub struct RootClassList {
    classes: Observable<BTreeSet<String>>,
}

impl RootClassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.with(|classes| classes.contains(class))
    }

    pub fn subscribe(&self) -> watch::Receiver<BTreeSet<String>> {
        self.classes.subscribe()
    }
}

impl PresentationToggle for RootClassList {
    fn set_class(&self, class: &str, enabled: bool) {
        self.classes.update(|classes| {
            if enabled {
                classes.insert(class.to_string());
            } else {
                classes.remove(class);
            }
        });
    }
}

/// Resolved theme (light or dark)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvedTheme {
    #[default]
    Light,
    Dark,
}

impl ResolvedTheme {
    #[must_use]
    pub const fn from_dark_mode(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Terminal colours for this theme
    #[must_use]
    pub const fn palette(self) -> &'static TerminalPalette {
        match self {
            Self::Light => &LIGHT_PALETTE,
            Self::Dark => &DARK_PALETTE,
        }
    }
}

impl fmt::Display for ResolvedTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
        })
    }
}

/// ANSI escape sequences used when rendering to a terminal.
#[derive(Debug, Clone, Copy)]
pub struct TerminalPalette {
    pub heading: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
    pub success: &'static str,
    pub error: &'static str,
    pub reset: &'static str,
}

impl TerminalPalette {
    /// Wrap `text` in `style` and the reset sequence.
    pub fn paint(&self, style: &str, text: &str) -> String {
        format!("{style}{text}{}", self.reset)
    }
}

/// Light terminal background colors
pub const LIGHT_PALETTE: TerminalPalette = TerminalPalette {
    heading: "\x1b[1;30m",
    muted: "\x1b[90m",
    accent: "\x1b[34m",
    success: "\x1b[32m",
    error: "\x1b[31m",
    reset: "\x1b[0m",
};

/// Dark terminal background colors
pub const DARK_PALETTE: TerminalPalette = TerminalPalette {
    heading: "\x1b[1;97m",
    muted: "\x1b[37m",
    accent: "\x1b[94m",
    success: "\x1b[92m",
    error: "\x1b[91m",
    reset: "\x1b[0m",
};

/// Persisted dark-mode flag mirrored onto a presentation root.
#[derive(Clone)]
pub struct DarkMode {
    value: Observable<bool>,
    repo: Arc<dyn PreferenceRepository>,
    toggle: Arc<dyn PresentationToggle>,
}

impl fmt::Debug for DarkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DarkMode")
            .field("enabled", &self.get())
            .finish_non_exhaustive()
    }
}

impl DarkMode {
    /// Read the persisted flag and apply it to the presentation root.
    ///
    /// Falls back to `false` when storage is unavailable, unset or holds
    /// anything other than `"true"`.
    pub fn load(repo: Arc<dyn PreferenceRepository>, toggle: Arc<dyn PresentationToggle>) -> Self {
        let enabled = match repo.get(DARK_MODE_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(error) => {
                tracing::warn!("Failed to read dark mode preference: {error}");
                false
            }
        };
        toggle.set_class(DARK_CLASS, enabled);
        Self {
            value: Observable::new(enabled),
            repo,
            toggle,
        }
    }

    /// Non-persistent instance backed by memory only.
    pub fn in_memory() -> Self {
        Self::load(
            Arc::new(MemoryPreferenceRepository::new()),
            Arc::new(RootClassList::new()),
        )
    }

    pub fn get(&self) -> bool {
        self.value.get()
    }

    pub fn theme(&self) -> ResolvedTheme {
        ResolvedTheme::from_dark_mode(self.get())
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.value.subscribe()
    }

    /// Persist `enabled`, then update the root class, then memory.
    ///
    /// If persisting fails nothing else changes.
    pub fn set(&self, enabled: bool) -> Result<()> {
        self.repo
            .set(DARK_MODE_KEY, if enabled { "true" } else { "false" })?;
        self.toggle.set_class(DARK_CLASS, enabled);
        self.value.set(enabled);
        tracing::debug!(enabled, "Dark mode updated");
        Ok(())
    }

    /// Flip the flag. Returns the new value.
    pub fn toggle(&self) -> Result<bool> {
        let enabled = !self.get();
        self.set(enabled)?;
        Ok(enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn setup(
        values: &[(&'static str, &'static str)],
    ) -> (Arc<MemoryPreferenceRepository>, RootClassList, DarkMode) {
        let repo = Arc::new(MemoryPreferenceRepository::with_values(values.iter().copied()));
        let root = RootClassList::new();
        let dark_mode = DarkMode::load(repo.clone(), Arc::new(root.clone()));
        (repo, root, dark_mode)
    }

    fn persisted(repo: &MemoryPreferenceRepository) -> Option<String> {
        repo.get(DARK_MODE_KEY).unwrap()
    }

    #[test]
    fn test_load_defaults_to_light() {
        let (_, root, dark_mode) = setup(&[]);
        assert!(!dark_mode.get());
        assert!(!root.contains(DARK_CLASS));
        assert_eq!(dark_mode.theme(), ResolvedTheme::Light);
    }

    #[test]
    fn test_load_reads_persisted_true() {
        let (_, root, dark_mode) = setup(&[(DARK_MODE_KEY, "true")]);
        assert!(dark_mode.get());
        assert!(root.contains(DARK_CLASS));
    }

    #[test]
    fn test_load_treats_garbage_as_false() {
        let (_, _, dark_mode) = setup(&[(DARK_MODE_KEY, "yes please")]);
        assert!(!dark_mode.get());
    }

    #[test]
    fn test_load_with_unavailable_storage() {
        let repo = Arc::new(MemoryPreferenceRepository::new());
        repo.set_unavailable(true);
        let dark_mode = DarkMode::load(repo, Arc::new(RootClassList::new()));
        assert!(!dark_mode.get());
    }

    #[test]
    fn test_set_keeps_all_three_consistent() {
        let (repo, root, dark_mode) = setup(&[]);

        dark_mode.set(true).unwrap();
        assert!(dark_mode.get());
        assert!(root.contains(DARK_CLASS));
        assert_eq!(persisted(&repo).as_deref(), Some("true"));

        dark_mode.set(false).unwrap();
        assert!(!dark_mode.get());
        assert!(!root.contains(DARK_CLASS));
        assert_eq!(persisted(&repo).as_deref(), Some("false"));
    }

    #[test]
    fn test_toggle_twice_restores_original() {
        let (repo, root, dark_mode) = setup(&[(DARK_MODE_KEY, "false")]);

        assert!(dark_mode.toggle().unwrap());
        assert!(!dark_mode.toggle().unwrap());

        assert_eq!(persisted(&repo).as_deref(), Some("false"));
        assert!(!root.contains(DARK_CLASS));
        assert!(!dark_mode.get());
    }

    #[test]
    fn test_failed_persist_changes_nothing() {
        let (repo, root, dark_mode) = setup(&[]);
        repo.set_unavailable(true);

        assert!(dark_mode.set(true).is_err());
        assert!(dark_mode.toggle().is_err());
        assert!(!dark_mode.get());
        assert!(!root.contains(DARK_CLASS));
    }

    #[test]
    fn test_palette_follows_theme() {
        assert_eq!(ResolvedTheme::from_dark_mode(true).palette().error, "\x1b[91m");
        let painted = LIGHT_PALETTE.paint(LIGHT_PALETTE.accent, "id");
        assert_eq!(painted, "\x1b[34mid\x1b[0m");
    }
}
