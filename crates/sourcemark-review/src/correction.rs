//! Correction workflow: a single-draft state machine over one parameter.
//!
//! ```text
//! Closed --open(Some)--> Open --set_value(diverging)--> Editing
//!   ^                     |  ^                            |
//!   |                     |  +------- reset / set_value --+
//!   +-- cancel / save ----+----------- cancel / save -----+
//! ```
//!
//! The workflow performs no I/O. `save` hands a [`CorrectionEvent`] to the
//! caller and closes immediately; persisting it is the caller's job.

use serde::Serialize;
use tracing::{debug, info};

use sourcemark_core::{CorrectionEvent, DataType, Parameter, ParameterValue};

use crate::config::ValidationLimits;
use crate::error::ReviewError;
use crate::validation::{ValidationReport, validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Closed,
    /// Draft equals the original value.
    Open,
    /// Draft differs from the original value.
    Editing,
}

/// Transient editing state for one open correction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectionDraft {
    pub parameter_name: String,
    pub draft_value: String,
    pub reason: Option<String>,
    pub validation: ValidationReport,
}

#[derive(Debug)]
struct Session {
    original: Parameter,
    original_text: String,
    draft: CorrectionDraft,
}

#[derive(Debug, Default)]
pub struct CorrectionWorkflow {
    limits: ValidationLimits,
    session: Option<Session>,
}

impl CorrectionWorkflow {
    pub fn new(limits: ValidationLimits) -> Self {
        Self {
            limits,
            session: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.session {
            None => Phase::Closed,
            Some(s) if s.draft.draft_value == s.original_text => Phase::Open,
            Some(_) => Phase::Editing,
        }
    }

    pub fn draft(&self) -> Option<&CorrectionDraft> {
        self.session.as_ref().map(|s| &s.draft)
    }

    /// The parameter being corrected, as it was when the session opened.
    pub fn target(&self) -> Option<&Parameter> {
        self.session.as_ref().map(|s| &s.original)
    }

    /// Start a correction for `target`, copying its value into a fresh draft.
    ///
    /// `None` leaves the workflow untouched. Any session already open is
    /// discarded first, so at most one draft is alive.
    pub fn open(&mut self, target: Option<&Parameter>) -> Phase {
        let Some(target) = target else {
            return self.phase();
        };
        if let Some(previous) = self.session.take() {
            debug!(
                previous = %previous.original.name,
                next = %target.name,
                "discarding open correction"
            );
        }

        let original_text = target.value.to_string();
        let validation = validate(&original_text, target, &self.limits);
        self.session = Some(Session {
            original: target.clone(),
            draft: CorrectionDraft {
                parameter_name: target.name.clone(),
                draft_value: original_text.clone(),
                reason: None,
                validation,
            },
            original_text,
        });
        debug!(parameter = %target.name, "correction opened");
        self.phase()
    }

    /// Replace the draft text and re-run validation.
    pub fn set_value(&mut self, text: impl Into<String>) -> Result<&ValidationReport, ReviewError> {
        let limits = self.limits;
        let session = self.session.as_mut().ok_or(ReviewError::NotOpen)?;
        session.draft.draft_value = text.into();
        session.draft.validation = validate(&session.draft.draft_value, &session.original, &limits);
        Ok(&session.draft.validation)
    }

    /// Set or clear the free-text reason. Blank reasons count as none.
    pub fn set_reason(&mut self, reason: Option<String>) -> Result<(), ReviewError> {
        let session = self.session.as_mut().ok_or(ReviewError::NotOpen)?;
        session.draft.reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        Ok(())
    }

    /// Restore the original value without closing.
    pub fn reset(&mut self) -> Result<Phase, ReviewError> {
        let session = self.session.as_mut().ok_or(ReviewError::NotOpen)?;
        let original = session.original_text.clone();
        self.set_value(original)?;
        Ok(self.phase())
    }

    /// Discard the draft. Closing an already closed workflow is a no-op.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(parameter = %session.original.name, "correction cancelled");
        }
    }

    /// Backdrop dismissal; behaves exactly like [`cancel`](Self::cancel).
    pub fn dismiss(&mut self) {
        self.cancel();
    }

    pub fn can_save(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.draft.validation.is_valid())
    }

    /// Emit the correction and close.
    ///
    /// Fails without closing when validation has errors.
    pub fn save(&mut self) -> Result<CorrectionEvent, ReviewError> {
        let session = self.session.as_ref().ok_or(ReviewError::NotOpen)?;
        if !session.draft.validation.is_valid() {
            return Err(ReviewError::SaveBlocked {
                parameter: session.original.name.clone(),
                errors: session.draft.validation.errors.clone(),
            });
        }
        let new_value = draft_to_value(session.original.data_type(), &session.draft.draft_value)?;

        let Some(session) = self.session.take() else {
            return Err(ReviewError::NotOpen);
        };
        let event = CorrectionEvent {
            parameter_name: session.original.name,
            old_value: session.original.value,
            new_value,
            reason: session.draft.reason,
        };
        info!(parameter = %event.parameter_name, "correction saved");
        Ok(event)
    }
}

/// Convert a validated draft into a typed value.
///
/// Blank drafts for non-text types (allowed for job-level parameters) clear
/// the value but keep the declared type.
fn draft_to_value(data_type: DataType, draft: &str) -> Result<ParameterValue, ReviewError> {
    let is_text = matches!(data_type, DataType::String | DataType::Enum);
    if draft.trim().is_empty() && !is_text {
        return Ok(ParameterValue::Unset(data_type));
    }
    Ok(ParameterValue::parse(data_type, draft)?)
}
