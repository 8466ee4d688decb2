//! Highlighted text rendering.
//!
//! Turns a text and its parameters into an ordered list of plain and
//! highlighted segments. Concatenating the segment texts always gives the
//! input text back.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use sourcemark_core::{HighlightStyle, Parameter, Region, Span, highlight_style, merge, partition};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment<'a> {
    Plain {
        span: Span,
        text: &'a str,
    },
    Highlighted {
        span: Span,
        text: &'a str,
        /// Click and hover target: the first parameter in sort order.
        parameter: &'a Parameter,
        /// Every parameter name covering this range, target first.
        labels: Vec<&'a str>,
        style: HighlightStyle,
    },
}

impl<'a> Segment<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Self::Plain { text, .. } | Self::Highlighted { text, .. } => *text,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Plain { span, .. } | Self::Highlighted { span, .. } => *span,
        }
    }

    pub fn parameter(&self) -> Option<&'a Parameter> {
        match self {
            Self::Plain { .. } => None,
            Self::Highlighted { parameter, .. } => Some(*parameter),
        }
    }

    pub fn labels(&self) -> &[&'a str] {
        match self {
            Self::Plain { .. } => &[],
            Self::Highlighted { labels, .. } => labels,
        }
    }
}

/// Render `full_text` with one highlight per merged display range.
///
/// Malformed spans degrade to plain text for that parameter only.
pub fn render<'a>(full_text: &'a str, parameters: &'a [Parameter]) -> Vec<Segment<'a>> {
    // Byte offset of every char boundary, including the end of the text.
    let offsets: Vec<usize> = full_text
        .char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(full_text.len()))
        .collect();
    let text_len = offsets.len() - 1;

    let mut by_name: HashMap<&str, &Parameter> = HashMap::with_capacity(parameters.len());
    for p in parameters {
        by_name.entry(p.name.as_str()).or_insert(p);
    }

    let ranges = merge(parameters, text_len);
    let regions = partition(text_len, &ranges);
    debug!(
        parameters = parameters.len(),
        highlights = ranges.len(),
        "rendered text"
    );

    regions
        .into_iter()
        .map(|region| {
            let span = region.span();
            let text = &full_text[offsets[span.start]..offsets[span.end]];
            match region {
                Region::Plain { .. } => Segment::Plain { span, text },
                Region::Highlight { range } => {
                    let labels: Vec<&str> = range
                        .labels
                        .iter()
                        .filter_map(|l| by_name.get(l.as_str()).copied())
                        .map(|p| p.name.as_str())
                        .collect();
                    match labels.first().and_then(|l| by_name.get(l)).copied() {
                        Some(parameter) => Segment::Highlighted {
                            span,
                            text,
                            parameter,
                            labels,
                            style: highlight_style(parameter.confidence, parameter.scope),
                        },
                        None => Segment::Plain { span, text },
                    }
                }
            }
        })
        .collect()
}

/// Pointer input against a rendered segment list, by segment index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter(usize),
    Leave(usize),
    Click(usize),
    Edit(usize),
}

/// Interaction reported to the caller. Never produced for plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum HighlightEvent {
    Click(Parameter),
    /// `None` when the pointer left the hovered highlight.
    Hover(Option<Parameter>),
    Edit(Parameter),
}

/// Exclusive hover state over one rendered segment list.
///
/// The most recently entered highlight wins; leaving any other segment does
/// not clear it. Call [`clear`](Self::clear) after re-rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HoverTracker {
    active: Option<usize>,
    hovered: Option<String>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_segment(&self) -> Option<usize> {
        self.active
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.hovered = None;
    }

    pub fn handle(&mut self, segments: &[Segment<'_>], event: PointerEvent) -> Option<HighlightEvent> {
        match event {
            PointerEvent::Enter(i) => {
                let parameter = segments.get(i)?.parameter()?;
                if self.active == Some(i) {
                    return None;
                }
                self.active = Some(i);
                self.hovered = Some(parameter.name.clone());
                Some(HighlightEvent::Hover(Some(parameter.clone())))
            }
            PointerEvent::Leave(i) => {
                if self.active != Some(i) {
                    return None;
                }
                self.clear();
                Some(HighlightEvent::Hover(None))
            }
            PointerEvent::Click(i) => {
                let parameter = segments.get(i)?.parameter()?;
                Some(HighlightEvent::Click(parameter.clone()))
            }
            PointerEvent::Edit(i) => {
                let parameter = segments.get(i)?.parameter()?;
                Some(HighlightEvent::Edit(parameter.clone()))
            }
        }
    }
}
