//! Review surface for extracted parameters: highlighted rendering, the
//! provenance panel, and the correction workflow.
//!
//! Everything here is synchronous and side-effect free apart from logging.
//! Outputs are values ([`render::Segment`], [`panel::Card`]) and events
//! ([`sourcemark_core::ReviewEvent`]) for the caller to act on.

pub mod config;
pub mod correction;
mod error;
pub mod panel;
pub mod render;
pub mod validation;

pub use config::{ReviewConfig, ValidationLimits};
pub use correction::{CorrectionDraft, CorrectionWorkflow, Phase};
pub use error::{ConfigError, ReviewError};
pub use panel::{
    Card, CardAction, ContextPreview, PanelAction, PanelFilter, PanelOutcome, PanelState,
    PanelSummary, SortKey, cards, context_preview, summary,
};
pub use render::{HighlightEvent, HoverTracker, PointerEvent, Segment, render};
pub use validation::{ValidationIssue, ValidationReport, validate};
