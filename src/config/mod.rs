//! Persisted user preferences: theme, operating mode and category list.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::utils::{ensure_dir, write_atomic, PathResolver};
use crate::domain::OperatingMode;
use crate::errors::LedgerError;

pub const DEFAULT_CATEGORIES: [&str; 10] = [
    "Groceries",
    "Toiletries",
    "Transport",
    "School",
    "Entertainment",
    "Rent",
    "Utilities",
    "Health",
    "Business",
    "Other",
];

/// Selectable visual themes. Only the identifier is persisted.
pub const THEMES: [(&str, &str); 5] = [
    ("executive", "Executive Gold"),
    ("hustler", "Night Hustler"),
    ("princess", "Pink Princess"),
    ("exam", "Exam Season"),
    ("zen", "Zen Garden"),
];

pub const DEFAULT_THEME: &str = "executive";

pub fn theme_name(id: &str) -> Option<&'static str> {
    THEMES
        .iter()
        .find(|(theme_id, _)| *theme_id == id)
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub mode: OperatingMode,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|name| name.to_string()).collect()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            mode: OperatingMode::default(),
            categories: default_categories(),
        }
    }
}

impl Preferences {
    /// Replaces unknown theme ids with the default and restores the category
    /// list when it was persisted empty.
    pub fn sanitized(mut self) -> Self {
        if theme_name(&self.theme).is_none() {
            tracing::warn!(theme = %self.theme, "unknown theme in preferences, using default");
            self.theme = default_theme();
        }
        if self.categories.is_empty() {
            self.categories = default_categories();
        }
        self
    }
}

/// Loads and saves [`Preferences`] as a JSON file.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(PathResolver::resolve_base(None))
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::preferences_file_in(&base),
        })
    }

    /// Reads preferences, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load(&self) -> Preferences {
        if !self.path.exists() {
            return Preferences::default();
        }
        let parsed = fs::read_to_string(&self.path)
            .map_err(LedgerError::from)
            .and_then(|data| serde_json::from_str::<Preferences>(&data).map_err(LedgerError::from));
        match parsed {
            Ok(preferences) => preferences.sanitized(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to load preferences");
                Preferences::default()
            }
        }
    }

    pub fn save(&self, preferences: &Preferences) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(preferences)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
