//! Confidence tiers and the highlight styling derived from them.

use serde::{Deserialize, Serialize};

use crate::parameter::Scope;

/// Below this, a parameter needs review regardless of confirmation.
pub const REVIEW_THRESHOLD: f64 = 0.7;
/// Lower bound of the panel's "high confidence" filter.
pub const HIGH_CONFIDENCE_FILTER: f64 = 0.8;

const HIGH: f64 = 0.9;
const MEDIUM: f64 = 0.7;
const LOW: f64 = 0.5;

/// Discrete confidence bucket driving visual emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    VeryLow,
    Low,
    Medium,
    High,
}

/// Status icon shown next to a highlight or card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusIcon {
    Check,
    Info,
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderStyle {
    Solid,
    Dashed,
}

/// Visual treatment of one highlight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HighlightStyle {
    pub tier: Tier,
    pub icon: StatusIcon,
    /// Base hue of the tier as `#rrggbb`.
    pub color: &'static str,
    /// Fill opacity in `[0.3, 1.0]`, scaled by confidence.
    pub opacity: f32,
    pub border: BorderStyle,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::High, Tier::Medium, Tier::Low, Tier::VeryLow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::VeryLow => "very_low",
        }
    }

    pub fn icon(&self) -> StatusIcon {
        match self {
            Self::High => StatusIcon::Check,
            Self::Medium => StatusIcon::Info,
            Self::Low | Self::VeryLow => StatusIcon::Alert,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::High => "#16a34a",
            Self::Medium => "#2563eb",
            Self::Low => "#d97706",
            Self::VeryLow => "#dc2626",
        }
    }
}

/// Clamp a raw score into `[0, 1]`. NaN becomes 0.
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Map a confidence score to its tier.
///
/// Total over `f64`: out-of-range scores are clamped, NaN is `VeryLow`.
pub fn classify(confidence: f64) -> Tier {
    let c = clamp_confidence(confidence);
    if c >= HIGH {
        Tier::High
    } else if c >= MEDIUM {
        Tier::Medium
    } else if c >= LOW {
        Tier::Low
    } else {
        Tier::VeryLow
    }
}

/// Style for a highlight of the given confidence and scope.
///
/// Job-level parameters get a dashed border so the two scopes stay apart
/// when tiers match.
pub fn highlight_style(confidence: f64, scope: Scope) -> HighlightStyle {
    let tier = classify(confidence);
    let c = clamp_confidence(confidence) as f32;
    HighlightStyle {
        tier,
        icon: tier.icon(),
        color: tier.color(),
        opacity: 0.3 + 0.7 * c,
        border: match scope {
            Scope::Stream => BorderStyle::Solid,
            Scope::Job => BorderStyle::Dashed,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(classify(0.9), Tier::High);
        assert_eq!(classify(0.89999), Tier::Medium);
        assert_eq!(classify(0.7), Tier::Medium);
        assert_eq!(classify(0.69999), Tier::Low);
        assert_eq!(classify(0.5), Tier::Low);
        assert_eq!(classify(0.49999), Tier::VeryLow);
        assert_eq!(classify(0.0), Tier::VeryLow);
        assert_eq!(classify(1.0), Tier::High);
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(classify(1.7), Tier::High);
        assert_eq!(classify(-0.2), Tier::VeryLow);
        assert_eq!(classify(f64::NAN), Tier::VeryLow);
        assert_eq!(classify(f64::INFINITY), Tier::High);
    }

    #[test]
    fn tier_labels_match_serde_names() {
        for tier in Tier::ALL {
            let json = serde_json::to_value(tier).unwrap();
            assert_eq!(json, serde_json::Value::String(tier.as_str().to_string()));
        }
        assert_eq!(Tier::VeryLow.as_str(), "very_low");
    }

    #[test]
    fn icons_follow_tier() {
        assert_eq!(Tier::High.icon(), StatusIcon::Check);
        assert_eq!(Tier::Medium.icon(), StatusIcon::Info);
        assert_eq!(Tier::Low.icon(), StatusIcon::Alert);
        assert_eq!(Tier::VeryLow.icon(), StatusIcon::Alert);
    }

    #[test]
    fn opacity_scales_within_tier() {
        let weak = highlight_style(0.9, Scope::Stream);
        let strong = highlight_style(1.0, Scope::Stream);
        assert_eq!(weak.tier, strong.tier);
        assert_eq!(weak.color, strong.color);
        assert!(weak.opacity < strong.opacity);
        assert!((strong.opacity - 1.0).abs() < 1e-6);
        assert!((highlight_style(-1.0, Scope::Job).opacity - 0.3).abs() < 1e-6);
    }

    #[test]
    fn scope_picks_border() {
        assert_eq!(highlight_style(0.8, Scope::Stream).border, BorderStyle::Solid);
        assert_eq!(highlight_style(0.8, Scope::Job).border, BorderStyle::Dashed);
    }

    #[test]
    fn tiers_order_by_strength() {
        assert!(Tier::High > Tier::Medium);
        assert!(Tier::Low > Tier::VeryLow);
    }
}
