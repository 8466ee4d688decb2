use chrono::DateTime;
use proptest::prelude::*;
use sourcemark_core::{Parameter, ParameterValue, Region, Scope, Span, merge, merge_ranges, partition};
use sourcemark_review::render;

fn parameters(raw: &[(usize, usize, f64)]) -> Vec<Parameter> {
    raw.iter()
        .enumerate()
        .map(|(i, &(start, end, confidence))| Parameter {
            name: format!("P{i}"),
            value: ParameterValue::String(format!("v{i}")),
            confidence,
            source_text: String::new(),
            span: Span::new(start, end),
            scope: if i % 2 == 0 { Scope::Stream } else { Scope::Job },
            extraction_method: "generated".to_string(),
            user_confirmed: false,
            extracted_at: DateTime::from_timestamp(0, 0).unwrap(),
            choices: Vec::new(),
        })
        .collect()
}

fn arb_case() -> impl Strategy<Value = (String, Vec<(usize, usize, f64)>)> {
    (
        "[a-zäß →]{0,60}",
        prop::collection::vec((0usize..80, 0usize..80, -0.5f64..1.5), 0..12),
    )
}

proptest! {
    #[test]
    fn rendering_round_trips((text, raw) in arb_case()) {
        let params = parameters(&raw);
        let segments = render(&text, &params);
        let joined: String = segments.iter().map(|s| s.text()).collect();
        prop_assert_eq!(joined, text);
    }

    #[test]
    fn merged_ranges_are_disjoint_and_ordered((text, raw) in arb_case()) {
        let params = parameters(&raw);
        let ranges = merge(&params, text.chars().count());
        for pair in ranges.windows(2) {
            prop_assert!(pair[0].span.end < pair[1].span.start);
        }
        for (i, a) in ranges.iter().enumerate() {
            for b in &ranges[i + 1..] {
                prop_assert!(!a.span.intersects(&b.span));
            }
        }
    }

    #[test]
    fn partition_covers_text_exactly_once((text, raw) in arb_case()) {
        let params = parameters(&raw);
        let len = text.chars().count();
        let regions = partition(len, &merge(&params, len));
        let mut cursor = 0;
        for region in &regions {
            let span = region.span();
            prop_assert_eq!(span.start, cursor);
            prop_assert!(span.end > span.start);
            cursor = span.end;
        }
        prop_assert_eq!(cursor, len);
        // Gaps and highlights alternate; two plain regions never touch.
        for pair in regions.windows(2) {
            let both_plain = matches!(pair[0], Region::Plain { .. })
                && matches!(pair[1], Region::Plain { .. });
            prop_assert!(!both_plain);
        }
    }

    #[test]
    fn merging_is_idempotent((text, raw) in arb_case()) {
        let params = parameters(&raw);
        let once = merge(&params, text.chars().count());
        prop_assert_eq!(merge_ranges(once.clone()), once);
    }

    #[test]
    fn every_valid_span_stays_discoverable((text, raw) in arb_case()) {
        let params = parameters(&raw);
        let len = text.chars().count();
        let ranges = merge(&params, len);
        for p in &params {
            let clamped = p.span.clamp_to(len);
            if p.span.is_inverted() || clamped.is_empty() {
                continue;
            }
            let covering = ranges
                .iter()
                .find(|r| r.span.start <= clamped.start && clamped.end <= r.span.end);
            prop_assert!(covering.is_some_and(|r| r.labels.contains(&p.name)));
        }
    }
}
