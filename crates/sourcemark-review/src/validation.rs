//! Type-aware validation of correction drafts.
//!
//! Validation never refuses input. Errors block saving; warnings are shown
//! alongside the draft and do not.

use serde::Serialize;
use thiserror::Error;

use sourcemark_core::{DataType, Parameter, ParameterValue, Scope, ValueParseError};

use crate::config::ValidationLimits;

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("'{name}' is a required stream field and cannot be empty")]
    Required { name: String },

    #[error("value is empty")]
    Empty,

    #[error("must be a whole number (integer)")]
    NotInteger,

    #[error("whole number is too large (allowed range {min}..={max})", min = i64::MIN, max = i64::MAX)]
    IntegerOutOfRange,

    #[error("must be a finite number")]
    NotNumber,

    #[error("must be true or false")]
    NotBoolean,

    #[error("must be a date in YYYY-MM-DD format")]
    NotDate,

    #[error("must be one of: {}", .allowed.join(", "))]
    NotAChoice { allowed: Vec<String> },

    #[error("value is {len} characters long (recommended at most {max})")]
    TooLong { len: usize, max: usize },

    #[error("name is {len} characters long; names over {max} characters are hard to read")]
    NameTooLong { len: usize, max: usize },

    #[error("keeping a low-confidence value ({confidence:.2}) without changes")]
    LowConfidenceKept { confidence: f64 },
}

impl From<ValueParseError> for ValidationIssue {
    fn from(e: ValueParseError) -> Self {
        match e {
            ValueParseError::NotInteger { .. } => Self::NotInteger,
            ValueParseError::IntegerOutOfRange { .. } => Self::IntegerOutOfRange,
            ValueParseError::NotNumber { .. } => Self::NotNumber,
            ValueParseError::NotBoolean { .. } => Self::NotBoolean,
            ValueParseError::NotDate { .. } => Self::NotDate,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate `draft` as a new value for `target`.
pub fn validate(draft: &str, target: &Parameter, limits: &ValidationLimits) -> ValidationReport {
    let mut report = ValidationReport::default();

    if draft.trim().is_empty() {
        match target.scope {
            Scope::Stream => report.errors.push(ValidationIssue::Required {
                name: target.name.clone(),
            }),
            Scope::Job => report.warnings.push(ValidationIssue::Empty),
        }
        return report;
    }

    let data_type = target.data_type();
    match data_type {
        DataType::Integer | DataType::Number | DataType::Boolean | DataType::Date => {
            if let Err(e) = ParameterValue::parse(data_type, draft) {
                report.errors.push(e.into());
            }
        }
        DataType::Enum => {
            if !target.choices.is_empty() && !target.choices.iter().any(|c| c == draft) {
                report.errors.push(ValidationIssue::NotAChoice {
                    allowed: target.choices.clone(),
                });
            }
        }
        DataType::String | DataType::Other => {}
    }

    let len = draft.chars().count();
    if len > limits.max_value_chars {
        report.warnings.push(ValidationIssue::TooLong {
            len,
            max: limits.max_value_chars,
        });
    }
    if is_name_like(&target.name) && len > limits.max_name_chars {
        report.warnings.push(ValidationIssue::NameTooLong {
            len,
            max: limits.max_name_chars,
        });
    }

    if target.confidence < limits.low_confidence_floor && draft == target.value.to_string() {
        report.warnings.push(ValidationIssue::LowConfidenceKept {
            confidence: target.confidence,
        });
    }

    report
}

fn is_name_like(parameter_name: &str) -> bool {
    parameter_name.to_ascii_lowercase().contains("name")
}
