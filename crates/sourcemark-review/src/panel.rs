//! Provenance panel: filterable, sortable cards over the parameter list.
//!
//! All view state lives in [`PanelState`] and changes only through
//! [`PanelState::apply`]. Cards are recomputed from scratch on every call.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use tracing::debug;

use sourcemark_core::{
    HIGH_CONFIDENCE_FILTER, Parameter, ReviewEvent, Scope, Span, Tier, char_to_byte,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "filter", content = "scope", rename_all = "snake_case")]
pub enum PanelFilter {
    #[default]
    All,
    Scope(Scope),
    /// Confidence at or above [`HIGH_CONFIDENCE_FILTER`].
    HighConfidence,
    NeedsReview,
    Confirmed,
}

impl PanelFilter {
    pub fn matches(&self, p: &Parameter) -> bool {
        match self {
            Self::All => true,
            Self::Scope(scope) => p.scope == *scope,
            Self::HighConfidence => p.confidence >= HIGH_CONFIDENCE_FILTER,
            Self::NeedsReview => p.needs_review(),
            Self::Confirmed => p.user_confirmed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    ConfidenceDesc,
    ExtractedAtDesc,
    Scope,
}

/// Serializable view state of the panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelState {
    pub filter: PanelFilter,
    pub sort: SortKey,
    /// Case-insensitive match against name and value text.
    pub query: Option<String>,
    /// Card showing its full details.
    pub expanded: Option<String>,
    pub hovered: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    SetFilter(PanelFilter),
    SetSort(SortKey),
    SetQuery(Option<String>),
    /// Expand the named card, or collapse it if it is already expanded.
    ToggleExpanded(String),
    Hover(Option<String>),
    Reset,
}

impl PanelState {
    pub fn apply(&mut self, action: PanelAction) {
        debug!(?action, "panel action");
        match action {
            PanelAction::SetFilter(filter) => self.filter = filter,
            PanelAction::SetSort(sort) => self.sort = sort,
            PanelAction::SetQuery(query) => {
                self.query = query.map(|q| q.trim().to_string()).filter(|q| !q.is_empty());
            }
            PanelAction::ToggleExpanded(name) => {
                self.expanded = if self.expanded.as_deref() == Some(name.as_str()) {
                    None
                } else {
                    Some(name)
                };
            }
            PanelAction::Hover(name) => self.hovered = name,
            PanelAction::Reset => *self = Self::default(),
        }
    }

    /// Drop expanded/hovered names that no longer exist after a new
    /// parameter list arrives.
    pub fn retain_known(&mut self, parameters: &[Parameter]) {
        let known = |name: &Option<String>| {
            name.as_deref()
                .is_some_and(|n| parameters.iter().any(|p| p.name == n))
        };
        if !known(&self.expanded) {
            self.expanded = None;
        }
        if !known(&self.hovered) {
            self.hovered = None;
        }
    }

    fn matches_query(&self, p: &Parameter) -> bool {
        let Some(query) = &self.query else {
            return true;
        };
        let query = query.to_lowercase();
        p.name.to_lowercase().contains(&query) || p.value.to_string().to_lowercase().contains(&query)
    }
}

/// Source text around a span, split for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextPreview<'a> {
    pub before: &'a str,
    pub highlighted: &'a str,
    pub after: &'a str,
    /// Text exists before `before`.
    pub clipped_start: bool,
    /// Text exists after `after`.
    pub clipped_end: bool,
}

/// Window `[start - k, end + k]` around `span`, clamped to the text.
pub fn context_preview(full_text: &str, span: Span, k: usize) -> ContextPreview<'_> {
    let text_len = full_text.chars().count();
    let end = span.end.min(text_len);
    let start = span.start.min(end);
    let window_start = start.saturating_sub(k);
    let window_end = end.saturating_add(k).min(text_len);

    let b = |i| char_to_byte(full_text, i);
    let (ws, s, e, we) = (b(window_start), b(start), b(end), b(window_end));
    ContextPreview {
        before: &full_text[ws..s],
        highlighted: &full_text[s..e],
        after: &full_text[e..we],
        clipped_start: window_start > 0,
        clipped_end: window_end < text_len,
    }
}

/// One visible parameter in the panel.
#[derive(Debug, Clone, Serialize)]
pub struct Card<'a> {
    pub parameter: &'a Parameter,
    pub tier: Tier,
    pub needs_review: bool,
    pub expanded: bool,
    pub preview: ContextPreview<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Confirm,
    Edit,
    Delete,
    ViewInContext,
}

/// What the caller should do after a card action.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelOutcome {
    /// Forward to the persistence collaborator.
    Emit(ReviewEvent),
    /// Open the correction workflow for this parameter.
    OpenCorrection(String),
    /// Scroll the highlighted text to this span.
    Focus(Span),
}

impl Card<'_> {
    pub fn act(&self, action: CardAction) -> PanelOutcome {
        let name = self.parameter.name.clone();
        match action {
            CardAction::Confirm => PanelOutcome::Emit(ReviewEvent::confirm(name)),
            CardAction::Delete => PanelOutcome::Emit(ReviewEvent::delete(name)),
            CardAction::Edit => PanelOutcome::OpenCorrection(name),
            CardAction::ViewInContext => PanelOutcome::Focus(self.parameter.span),
        }
    }
}

/// Visible cards: filter, then query, then a stable sort.
pub fn cards<'a>(
    state: &PanelState,
    full_text: &'a str,
    parameters: &'a [Parameter],
    context_chars: usize,
) -> Vec<Card<'a>> {
    let mut visible: Vec<&Parameter> = parameters
        .iter()
        .filter(|p| state.filter.matches(p) && state.matches_query(p))
        .collect();

    match state.sort {
        SortKey::Name => visible.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::ConfidenceDesc => {
            visible.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        }
        SortKey::ExtractedAtDesc => visible.sort_by_key(|p| Reverse(p.extracted_at)),
        SortKey::Scope => visible.sort_by_key(|p| p.scope),
    }

    visible
        .into_iter()
        .map(|p| Card {
            parameter: p,
            tier: p.tier(),
            needs_review: p.needs_review(),
            expanded: state.expanded.as_deref() == Some(p.name.as_str()),
            preview: context_preview(full_text, p.span, context_chars),
        })
        .collect()
}

/// Counts shown above the card list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSummary {
    pub total: usize,
    pub confirmed: usize,
    pub needs_review: usize,
    /// Counts in `Tier::ALL` order: high, medium, low, very low.
    pub by_tier: [usize; 4],
    pub mean_confidence: Option<f64>,
}

pub fn summary(parameters: &[Parameter]) -> PanelSummary {
    let mut by_tier = [0usize; 4];
    for p in parameters {
        let idx = Tier::ALL.iter().position(|t| *t == p.tier()).unwrap_or(3);
        by_tier[idx] += 1;
    }
    let mean_confidence = if parameters.is_empty() {
        None
    } else {
        Some(parameters.iter().map(|p| p.confidence).sum::<f64>() / parameters.len() as f64)
    };
    PanelSummary {
        total: parameters.len(),
        confirmed: parameters.iter().filter(|p| p.user_confirmed).count(),
        needs_review: parameters.iter().filter(|p| p.needs_review()).count(),
        by_tier,
        mean_confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use sourcemark_core::ParameterValue;

    const TEXT: &str = "Stream NIGHTLY_BILLING runs on agent gs-01 every weekday at 02:30 with 3 retries";

    fn param(name: &str, span: (usize, usize), confidence: f64, scope: Scope, ts: i64) -> Parameter {
        Parameter {
            name: name.to_string(),
            value: ParameterValue::String(name.to_lowercase()),
            confidence,
            source_text: String::new(),
            span: Span::new(span.0, span.1),
            scope,
            extraction_method: "pattern".to_string(),
            user_confirmed: false,
            extracted_at: DateTime::<Utc>::from_timestamp(ts, 0).unwrap(),
            choices: Vec::new(),
        }
    }

    fn params() -> Vec<Parameter> {
        let mut retries = param("Retries", (71, 72), 0.55, Scope::Job, 300);
        retries.value = ParameterValue::Integer(3);
        let mut agent = param("Agent", (37, 42), 0.85, Scope::Job, 100);
        agent.user_confirmed = true;
        vec![
            param("StreamName", (7, 22), 0.97, Scope::Stream, 200),
            agent,
            retries,
            param("Calendar", (49, 56), 0.72, Scope::Stream, 100),
        ]
    }

    fn names(cards: &[Card<'_>]) -> Vec<String> {
        cards.iter().map(|c| c.parameter.name.clone()).collect()
    }

    fn visible(state: &PanelState, ps: &[Parameter]) -> Vec<String> {
        names(&cards(state, TEXT, ps, 10))
    }

    #[test]
    fn default_shows_all_by_name() {
        let ps = params();
        assert_eq!(
            visible(&PanelState::default(), &ps),
            ["Agent", "Calendar", "Retries", "StreamName"]
        );
    }

    #[test]
    fn filters_compose_with_sort() {
        let ps = params();
        let mut state = PanelState::default();
        state.apply(PanelAction::SetFilter(PanelFilter::Scope(Scope::Job)));
        state.apply(PanelAction::SetSort(SortKey::ConfidenceDesc));
        assert_eq!(visible(&state, &ps), ["Agent", "Retries"]);

        state.apply(PanelAction::SetFilter(PanelFilter::HighConfidence));
        assert_eq!(visible(&state, &ps), ["StreamName", "Agent"]);

        state.apply(PanelAction::SetFilter(PanelFilter::NeedsReview));
        assert_eq!(visible(&state, &ps), ["StreamName", "Calendar", "Retries"]);

        state.apply(PanelAction::SetFilter(PanelFilter::Confirmed));
        assert_eq!(visible(&state, &ps), ["Agent"]);
    }

    #[test]
    fn needs_review_includes_confirmed_low_confidence() {
        let mut ps = params();
        ps[2].user_confirmed = true; // Retries, 0.55
        let state = PanelState {
            filter: PanelFilter::NeedsReview,
            ..PanelState::default()
        };
        assert!(visible(&state, &ps).contains(&"Retries".to_string()));
    }

    #[test]
    fn extracted_at_desc_is_stable() {
        let ps = params();
        let state = PanelState {
            sort: SortKey::ExtractedAtDesc,
            ..PanelState::default()
        };
        // Agent and Calendar share a timestamp and keep input order.
        assert_eq!(
            visible(&state, &ps),
            ["Retries", "StreamName", "Agent", "Calendar"]
        );
    }

    #[test]
    fn scope_sort_puts_stream_first() {
        let ps = params();
        let state = PanelState {
            sort: SortKey::Scope,
            ..PanelState::default()
        };
        assert_eq!(
            visible(&state, &ps),
            ["StreamName", "Calendar", "Agent", "Retries"]
        );
    }

    #[test]
    fn query_matches_name_or_value() {
        let ps = params();
        let mut state = PanelState::default();
        state.apply(PanelAction::SetQuery(Some("  stream ".into())));
        assert_eq!(visible(&state, &ps), ["StreamName"]);

        state.apply(PanelAction::SetQuery(Some("3".into())));
        assert_eq!(visible(&state, &ps), ["Retries"]);

        state.apply(PanelAction::SetQuery(Some("   ".into())));
        assert_eq!(state.query, None);
        assert_eq!(visible(&state, &ps).len(), 4);
    }

    #[test]
    fn recomputes_on_new_parameter_list() {
        let mut ps = params();
        let state = PanelState {
            filter: PanelFilter::Confirmed,
            ..PanelState::default()
        };
        assert_eq!(visible(&state, &ps).len(), 1);
        ps[0].user_confirmed = true;
        assert_eq!(visible(&state, &ps).len(), 2);
    }

    #[test]
    fn preview_splits_window() {
        let preview = context_preview(TEXT, Span::new(37, 42), 10);
        assert_eq!(preview.highlighted, "gs-01");
        assert_eq!(preview.before, " on agent ");
        assert_eq!(preview.after, " every wee");
        assert!(preview.clipped_start);
        assert!(preview.clipped_end);
    }

    #[test]
    fn preview_clamps_at_text_edges() {
        let preview = context_preview("abc def", Span::new(0, 3), 25);
        assert_eq!(preview.before, "");
        assert_eq!(preview.highlighted, "abc");
        assert_eq!(preview.after, " def");
        assert!(!preview.clipped_start);
        assert!(!preview.clipped_end);

        let past = context_preview("abc def", Span::new(5, 40), 2);
        assert_eq!(past.highlighted, "ef");
        assert_eq!(past.before, " d");
    }

    #[test]
    fn preview_of_inverted_span_is_empty_highlight() {
        let preview = context_preview("abcdef", Span::new(4, 2), 1);
        assert_eq!(preview.highlighted, "");
    }

    #[test]
    fn toggle_expanded_and_retain_known() {
        let ps = params();
        let mut state = PanelState::default();
        state.apply(PanelAction::ToggleExpanded("Agent".into()));
        assert!(cards(&state, TEXT, &ps, 5).iter().any(|c| c.expanded));
        state.apply(PanelAction::ToggleExpanded("Agent".into()));
        assert_eq!(state.expanded, None);

        state.apply(PanelAction::ToggleExpanded("Gone".into()));
        state.apply(PanelAction::Hover(Some("Agent".into())));
        state.retain_known(&ps);
        assert_eq!(state.expanded, None);
        assert_eq!(state.hovered.as_deref(), Some("Agent"));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut state = PanelState::default();
        state.apply(PanelAction::SetSort(SortKey::Scope));
        state.apply(PanelAction::SetQuery(Some("x".into())));
        state.apply(PanelAction::Reset);
        assert_eq!(state, PanelState::default());
    }

    #[test]
    fn state_serializes() {
        let state = PanelState {
            filter: PanelFilter::Scope(Scope::Stream),
            sort: SortKey::ConfidenceDesc,
            ..PanelState::default()
        };
        let json = serde_json::to_string(&state).unwrap();
        let back: PanelState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn card_actions_map_to_outcomes() {
        let ps = params();
        let all = cards(&PanelState::default(), TEXT, &ps, 5);
        let agent = &all[0];
        assert_eq!(
            agent.act(CardAction::Confirm),
            PanelOutcome::Emit(ReviewEvent::confirm("Agent"))
        );
        assert_eq!(
            agent.act(CardAction::Delete),
            PanelOutcome::Emit(ReviewEvent::delete("Agent"))
        );
        assert_eq!(
            agent.act(CardAction::Edit),
            PanelOutcome::OpenCorrection("Agent".into())
        );
        assert_eq!(
            agent.act(CardAction::ViewInContext),
            PanelOutcome::Focus(Span::new(37, 42))
        );
    }

    #[test]
    fn summary_counts() {
        let s = summary(&params());
        assert_eq!(s.total, 4);
        assert_eq!(s.confirmed, 1);
        assert_eq!(s.needs_review, 3);
        assert_eq!(s.by_tier, [1, 2, 1, 0]);
        let mean = s.mean_confidence.unwrap();
        assert!((mean - (0.97 + 0.85 + 0.55 + 0.72) / 4.0).abs() < 1e-9);
        assert_eq!(summary(&[]).mean_confidence, None);
    }
}
