//! Review configuration: context window size and validation limits.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONTEXT_CHARS: usize = 25;

/// Thresholds the validator warns on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Longer drafts produce a warning.
    pub max_value_chars: usize,
    /// Longer drafts for name-like parameters produce an extra warning.
    pub max_name_chars: usize,
    /// Keeping an unchanged value below this confidence produces a warning.
    pub low_confidence_floor: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_value_chars: 500,
            max_name_chars: 50,
            low_confidence_floor: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Characters of context on each side of a card's preview.
    pub context_chars: usize,
    pub validation: ValidationLimits,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            context_chars: DEFAULT_CONTEXT_CHARS,
            validation: ValidationLimits::default(),
        }
    }
}

impl ReviewConfig {
    /// Load from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}
