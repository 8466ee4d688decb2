//! Events emitted by the review core for the persistence collaborator.

use serde::{Deserialize, Serialize};

use crate::parameter::ParameterValue;

/// A user-authored override of an extracted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionEvent {
    pub parameter_name: String,
    pub old_value: ParameterValue,
    pub new_value: ParameterValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmEvent {
    pub parameter_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEvent {
    pub parameter_name: String,
}

/// Everything the core asks the outside world to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReviewEvent {
    Correction(CorrectionEvent),
    Confirm(ConfirmEvent),
    Delete(DeleteEvent),
}

impl ReviewEvent {
    pub fn confirm(name: impl Into<String>) -> Self {
        Self::Confirm(ConfirmEvent {
            parameter_name: name.into(),
        })
    }

    pub fn delete(name: impl Into<String>) -> Self {
        Self::Delete(DeleteEvent {
            parameter_name: name.into(),
        })
    }

    pub fn parameter_name(&self) -> &str {
        match self {
            Self::Correction(e) => &e.parameter_name,
            Self::Confirm(e) => &e.parameter_name,
            Self::Delete(e) => &e.parameter_name,
        }
    }
}

impl From<CorrectionEvent> for ReviewEvent {
    fn from(e: CorrectionEvent) -> Self {
        Self::Correction(e)
    }
}
