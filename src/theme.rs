use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, THEME_KEY};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn from_os(prefers_dark: bool) -> Self {
        if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Icon shown on the toggle button: what clicking switches to.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Switch to dark theme",
            Theme::Dark => "Switch to light theme",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme `{other}`")),
        }
    }
}

/// Applies a theme: `data-theme` on the document root and the toggle button.
pub trait ThemeView {
    fn apply(&mut self, theme: Theme);
}

pub struct ThemeManager<S, V> {
    store: S,
    view: V,
    current: Theme,
}

impl<S: KeyValueStore, V: ThemeView> ThemeManager<S, V> {
    pub fn new(store: S, view: V) -> Self {
        Self {
            store,
            view,
            current: Theme::default(),
        }
    }

    /// Stored preference, else OS preference. Applied but not persisted, so
    /// OS changes keep working until the user picks a theme.
    pub fn init(&mut self, os_prefers_dark: bool) -> Theme {
        let theme = self
            .stored()
            .unwrap_or_else(|| Theme::from_os(os_prefers_dark));
        self.apply(theme);
        theme
    }

    /// OS preference flipped. Ignored once the user has an explicit preference.
    pub fn on_os_change(&mut self, prefers_dark: bool) -> Option<Theme> {
        if self.stored().is_some() {
            return None;
        }
        let theme = Theme::from_os(prefers_dark);
        self.apply(theme);
        Some(theme)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.store.set(THEME_KEY, theme.as_str());
        self.apply(theme);
    }

    pub fn toggle(&mut self) -> Theme {
        let next = self.current.toggled();
        self.set_theme(next);
        next
    }

    #[cfg(test)]
    pub fn current(&self) -> Theme {
        self.current
    }

    fn stored(&self) -> Option<Theme> {
        let raw = self.store.get(THEME_KEY)?;
        match raw.parse() {
            Ok(theme) => Some(theme),
            Err(err) => {
                log::warn!("ignoring stored theme: {err}");
                None
            }
        }
    }

    fn apply(&mut self, theme: Theme) {
        self.current = theme;
        self.view.apply(theme);
        log::debug!("theme set to {theme}");
    }
}
