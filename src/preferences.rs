//! Display preferences persisted between runs.

use log::warn;
use std::fmt;
use std::path::{Path, PathBuf};

/// Light or dark display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon of the switcher, which shows the theme it would switch to.
    pub fn switcher_icon(self) -> &'static str {
        match self {
            Theme::Light => "dark_mode",
            Theme::Dark => "light_mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

/// Process-wide preference record.
#[derive(Debug, Clone, Default)]
pub struct Preferences {
    theme: Theme,
    path: Option<PathBuf>,
}

impl Preferences {
    /// Load the stored preference, falling back to the default theme when the
    /// file is missing or unreadable.
    pub fn load(path: Option<&Path>) -> Self {
        let theme = path
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|content| Theme::parse(&content))
            .unwrap_or_default();
        Self {
            theme,
            path: path.map(Path::to_path_buf),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switch theme and persist the new value.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if let Some(path) = &self.path {
            if let Err(e) = std::fs::write(path, self.theme.to_string()) {
                warn!("Failed to persist theme to {}: {}", path.display(), e);
            }
        }
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("proxy-config-board-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_default_is_dark() {
        let prefs = Preferences::load(None);
        assert_eq!(prefs.theme(), Theme::Dark);
        assert_eq!(prefs.theme().switcher_icon(), "light_mode");
    }

    #[test]
    fn test_toggle_persists() {
        let path = temp_path("toggle");
        let _ = std::fs::remove_file(&path);

        let mut prefs = Preferences::load(Some(&path));
        assert_eq!(prefs.toggle_theme(), Theme::Light);
        assert_eq!(Preferences::load(Some(&path)).theme(), Theme::Light);

        assert_eq!(prefs.toggle_theme(), Theme::Dark);
        assert_eq!(Preferences::load(Some(&path)).theme(), Theme::Dark);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_garbage_file_uses_default() {
        let path = temp_path("garbage");
        std::fs::write(&path, "sepia").unwrap();
        assert_eq!(Preferences::load(Some(&path)).theme(), Theme::Dark);
        let _ = std::fs::remove_file(&path);
    }
}
