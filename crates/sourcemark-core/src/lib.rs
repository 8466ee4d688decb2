//! Core types for source-grounded parameter review: the parameter model,
//! span merging, confidence tiers, and the events the review surface emits.

pub mod confidence;
pub mod event;
pub mod parameter;
pub mod quality;
pub mod snapshot;
pub mod span;

pub use confidence::{
    BorderStyle, HIGH_CONFIDENCE_FILTER, HighlightStyle, REVIEW_THRESHOLD, StatusIcon, Tier,
    classify, highlight_style,
};
pub use event::{ConfirmEvent, CorrectionEvent, DeleteEvent, ReviewEvent};
pub use parameter::{
    DataType, Parameter, ParameterValue, Scope, Span, ValueParseError, char_to_byte, slice_chars,
};
pub use quality::{DataIssue, audit};
pub use snapshot::Snapshot;
pub use span::{DisplayRange, Region, merge, merge_ranges, partition};
