use thiserror::Error;

use sourcemark_core::ValueParseError;

use crate::validation::ValidationIssue;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("no correction is open")]
    NotOpen,

    #[error("save blocked for '{parameter}': {}", join_issues(.errors))]
    SaveBlocked {
        parameter: String,
        errors: Vec<ValidationIssue>,
    },

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("value conversion failed: {0}")]
    Value(#[from] ValueParseError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not readable: {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
