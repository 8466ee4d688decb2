//! Span merging: project possibly-overlapping parameter spans onto disjoint
//! display ranges.
//!
//! # Algorithm
//!
//! 1. Project each parameter to `(span, name)`. Ends past the text are
//!    clamped and inverted spans are skipped. Zero-length spans contribute
//!    no highlight. A name seen before is skipped so every label resolves
//!    to exactly one parameter.
//! 2. Sort by `start`, then `end`, stable on input order.
//! 3. Sweep left to right. A span starting at or before the open range's
//!    end extends it and adds its labels; otherwise the open range closes.
//!
//! Adjacent spans (`next.start == open.end`) merge into one range.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::parameter::{Parameter, Span};

/// Merged, non-overlapping interval used only for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRange {
    pub span: Span,
    /// Names of the parameters covered, in sort order, without duplicates.
    /// The first label is the click/hover target.
    pub labels: Vec<String>,
}

impl DisplayRange {
    pub fn new(span: Span, labels: Vec<String>) -> Self {
        Self { span, labels }
    }

    pub fn single(span: Span, label: impl Into<String>) -> Self {
        Self {
            span,
            labels: vec![label.into()],
        }
    }

    pub fn primary_label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }
}

/// A piece of the text partition: an un-highlighted gap or a display range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Region {
    Plain { span: Span },
    Highlight { range: DisplayRange },
}

impl Region {
    pub fn span(&self) -> Span {
        match self {
            Self::Plain { span } => *span,
            Self::Highlight { range } => range.span,
        }
    }
}

/// Merge parameter spans over a text of `text_len` characters.
///
/// Only the first parameter carrying a given name is highlighted.
pub fn merge(parameters: &[Parameter], text_len: usize) -> Vec<DisplayRange> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(parameters.len());
    let projected = parameters
        .iter()
        .filter(|p| {
            let first = seen.insert(p.name.as_str());
            if !first {
                warn!(parameter = %p.name, span = %p.span, "duplicate name, skipping highlight");
            }
            first
        })
        .filter_map(|p| project(p, text_len))
        .collect();
    merge_ranges(projected)
}

/// Clamp and validate one parameter span. `None` means no highlight.
fn project(param: &Parameter, text_len: usize) -> Option<DisplayRange> {
    let span = param.span;
    if span.is_inverted() {
        warn!(
            parameter = %param.name,
            start = span.start,
            end = span.end,
            "inverted span, skipping highlight"
        );
        return None;
    }
    if span.end > text_len {
        warn!(
            parameter = %param.name,
            start = span.start,
            end = span.end,
            text_len,
            "span exceeds text, clamping"
        );
    }
    let clamped = span.clamp_to(text_len);
    if clamped.is_empty() {
        debug!(parameter = %param.name, span = %span, "zero-length span, no highlight");
        return None;
    }
    Some(DisplayRange::single(clamped, param.name.clone()))
}

/// Sort and sweep ranges into a disjoint, ordered set.
///
/// Idempotent: feeding the output back in returns it unchanged.
pub fn merge_ranges(mut ranges: Vec<DisplayRange>) -> Vec<DisplayRange> {
    ranges.retain(|r| !r.span.is_empty());
    // `sort_by_key` is stable, so equal spans keep input order.
    ranges.sort_by_key(|r| (r.span.start, r.span.end));

    let mut merged: Vec<DisplayRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        if let Some(open) = merged.last_mut()
            && range.span.start <= open.span.end
        {
            open.span.end = open.span.end.max(range.span.end);
            push_labels(&mut open.labels, range.labels);
            continue;
        }
        let mut labels = Vec::with_capacity(range.labels.len());
        push_labels(&mut labels, range.labels);
        merged.push(DisplayRange::new(range.span, labels));
    }
    merged
}

fn push_labels(into: &mut Vec<String>, labels: Vec<String>) {
    for label in labels {
        if !into.contains(&label) {
            into.push(label);
        }
    }
}

/// Tile `[0, text_len)` with plain gaps and the given display ranges.
///
/// `ranges` must be the output of [`merge`] or [`merge_ranges`] for the same
/// text length. An empty text yields no regions.
pub fn partition(text_len: usize, ranges: &[DisplayRange]) -> Vec<Region> {
    let mut regions = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut cursor = 0;
    for range in ranges {
        let span = range.span.clamp_to(text_len);
        if span.start < cursor || span.is_empty() {
            // Not disjoint or outside the text; the caller broke the contract.
            warn!(span = %range.span, cursor, "display range out of order, skipping");
            continue;
        }
        if span.start > cursor {
            regions.push(Region::Plain {
                span: Span::new(cursor, span.start),
            });
        }
        regions.push(Region::Highlight {
            range: DisplayRange::new(span, range.labels.clone()),
        });
        cursor = span.end;
    }
    if cursor < text_len {
        regions.push(Region::Plain {
            span: Span::new(cursor, text_len),
        });
    }
    regions
}
