//! Application preferences persisted alongside the tournament.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Light or dark board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppTheme {
    pub name: String,
    pub color_mode: ColorMode,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            color_mode: ColorMode::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// BCP-47 style code, e.g. `en`
    pub code: String,
    pub name: String,
}

impl Default for Language {
    fn default() -> Self {
        Self {
            code: "en".to_string(),
            name: "English".to_string(),
        }
    }
}

/// User preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: AppTheme,
    pub language: Language,
    /// Level-change and countdown sounds
    pub sound_enabled: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: AppTheme::default(),
            language: Language::default(),
            sound_enabled: true,
        }
    }
}

impl AppSettings {
    pub fn set_theme(&mut self, theme: AppTheme) {
        self.theme = theme;
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Flip sound on or off, returning the new value
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    pub fn set_sound(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }
}
