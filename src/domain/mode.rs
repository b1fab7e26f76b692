use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::common::ParseVariantError;

/// Scopes which goals are visible and which advisory tone applies.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    #[default]
    #[serde(alias = "student")]
    Personal,
    Business,
}

impl OperatingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            OperatingMode::Personal => "personal",
            OperatingMode::Business => "business",
        }
    }

    /// Heading used when listing goals for the mode.
    pub fn goals_heading(self) -> &'static str {
        match self {
            OperatingMode::Personal => "Personal Goals",
            OperatingMode::Business => "Business Objectives",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatingMode {
    type Err = ParseVariantError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "personal" | "student" => Ok(OperatingMode::Personal),
            "business" => Ok(OperatingMode::Business),
            _ => Err(ParseVariantError::new("mode", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_alias_maps_to_personal() {
        let mode: OperatingMode = serde_json::from_str("\"student\"").unwrap();
        assert_eq!(mode, OperatingMode::Personal);
        assert_eq!(serde_json::to_string(&mode).unwrap(), "\"personal\"");
    }
}
