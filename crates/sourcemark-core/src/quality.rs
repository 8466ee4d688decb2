//! Data-quality audit for untrusted extraction results.
//!
//! Nothing here fails: issues are reported and logged, and the render path
//! degrades per parameter (see [`crate::span::merge`]).

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::parameter::Parameter;

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum DataIssue {
    #[error("'{name}': span end {end} exceeds text length {text_len}")]
    SpanPastEnd {
        name: String,
        end: usize,
        text_len: usize,
    },

    #[error("'{name}': span start {start} is after end {end}")]
    InvertedSpan {
        name: String,
        start: usize,
        end: usize,
    },

    #[error("'{name}': span is empty, no highlight")]
    EmptySpan { name: String },

    #[error("'{name}': duplicate parameter name")]
    DuplicateName { name: String },

    #[error("'{name}': confidence {confidence} outside [0, 1]")]
    ConfidenceOutOfRange { name: String, confidence: f64 },
}

impl DataIssue {
    pub fn parameter_name(&self) -> &str {
        match self {
            Self::SpanPastEnd { name, .. }
            | Self::InvertedSpan { name, .. }
            | Self::EmptySpan { name }
            | Self::DuplicateName { name }
            | Self::ConfidenceOutOfRange { name, .. } => name,
        }
    }
}

/// Check every parameter against `full_text` and report what is off.
///
/// Issues come out in parameter order; a parameter can raise several.
pub fn audit(full_text: &str, parameters: &[Parameter]) -> Vec<DataIssue> {
    let text_len = full_text.chars().count();
    let mut seen = HashSet::with_capacity(parameters.len());
    let mut issues = Vec::new();

    for p in parameters {
        let name = p.name.clone();
        if !seen.insert(p.name.as_str()) {
            issues.push(DataIssue::DuplicateName { name: name.clone() });
        }
        if p.span.is_inverted() {
            issues.push(DataIssue::InvertedSpan {
                name: name.clone(),
                start: p.span.start,
                end: p.span.end,
            });
        } else {
            if p.span.end > text_len {
                issues.push(DataIssue::SpanPastEnd {
                    name: name.clone(),
                    end: p.span.end,
                    text_len,
                });
            }
            if p.span.clamp_to(text_len).is_empty() {
                issues.push(DataIssue::EmptySpan { name: name.clone() });
            }
        }
        if !(0.0..=1.0).contains(&p.confidence) {
            issues.push(DataIssue::ConfidenceOutOfRange {
                name,
                confidence: p.confidence,
            });
        }
    }

    for issue in &issues {
        warn!(parameter = %issue.parameter_name(), "{issue}");
    }
    issues
}
