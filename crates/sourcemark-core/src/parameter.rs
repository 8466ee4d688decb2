//! Extracted parameter types shared by the renderer, panel, and correction flow.

use std::fmt;
use std::num::IntErrorKind;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::confidence::{REVIEW_THRESHOLD, Tier, classify};

/// Half-open character interval `[start, end)` into the full text.
///
/// Offsets count Unicode scalar values, not bytes. Use [`char_to_byte`]
/// before slicing a `&str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of characters covered. Inverted spans count as empty.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// True when the two half-open intervals share at least one character.
    /// Empty spans intersect nothing.
    pub fn intersects(&self, other: &Span) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }

    /// Clamp both ends to `len`.
    pub fn clamp_to(&self, len: usize) -> Span {
        Span {
            start: self.start.min(len),
            end: self.end.min(len),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Coarse grouping tag used for styling and filtering only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Stream,
    Job,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stream => "stream",
            Self::Job => "job",
        }
    }
}

/// Declared type of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    Integer,
    Number,
    Boolean,
    Enum,
    Date,
    Other,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::Date => "date",
            Self::Other => "other",
        }
    }
}

/// Parameter value, tagged by its declared data type.
///
/// Serialised adjacently tagged: `{"type": "integer", "value": 5}`. A value
/// cleared during review keeps its declared type as `Unset`:
/// `{"type": "unset", "value": "integer"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParameterValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Enum(String),
    Date(NaiveDate),
    Other(serde_json::Value),
    /// No value, declared as the inner type.
    Unset(DataType),
}

/// A draft string that does not fit the declared data type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueParseError {
    #[error("'{input}' is not a whole number (integer)")]
    NotInteger { input: String },
    #[error("'{input}' is outside the integer range {min}..={max}", min = i64::MIN, max = i64::MAX)]
    IntegerOutOfRange { input: String },
    #[error("'{input}' is not a finite number")]
    NotNumber { input: String },
    #[error("'{input}' is not a boolean (expected true or false)")]
    NotBoolean { input: String },
    #[error("'{input}' is not a date (expected YYYY-MM-DD)")]
    NotDate { input: String },
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

impl ParameterValue {
    pub fn data_type(&self) -> DataType {
        match self {
            Self::String(_) => DataType::String,
            Self::Integer(_) => DataType::Integer,
            Self::Number(_) => DataType::Number,
            Self::Boolean(_) => DataType::Boolean,
            Self::Enum(_) => DataType::Enum,
            Self::Date(_) => DataType::Date,
            Self::Other(_) => DataType::Other,
            Self::Unset(declared) => *declared,
        }
    }

    /// Convert editable text into a value of `data_type`.
    ///
    /// Numeric, boolean, and date inputs are trimmed first. String-like
    /// types keep the text verbatim. `Other` accepts any JSON literal and
    /// falls back to a JSON string. Never produces `Unset`.
    pub fn parse(data_type: DataType, text: &str) -> Result<Self, ValueParseError> {
        let trimmed = text.trim();
        match data_type {
            DataType::String => Ok(Self::String(text.to_string())),
            DataType::Enum => Ok(Self::Enum(text.to_string())),
            DataType::Integer => trimmed
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|e| match e.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        ValueParseError::IntegerOutOfRange {
                            input: text.to_string(),
                        }
                    }
                    _ => ValueParseError::NotInteger {
                        input: text.to_string(),
                    },
                }),
            DataType::Number => match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Self::Number(n)),
                _ => Err(ValueParseError::NotNumber {
                    input: text.to_string(),
                }),
            },
            DataType::Boolean => match trimmed {
                "true" => Ok(Self::Boolean(true)),
                "false" => Ok(Self::Boolean(false)),
                _ => Err(ValueParseError::NotBoolean {
                    input: text.to_string(),
                }),
            },
            DataType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(Self::Date)
                .map_err(|_| ValueParseError::NotDate {
                    input: text.to_string(),
                }),
            DataType::Other => Ok(Self::Other(
                serde_json::from_str(trimmed)
                    .unwrap_or_else(|_| serde_json::Value::String(text.to_string())),
            )),
        }
    }
}

/// Editable text of the value. `parse(data_type(), to_string())` gives the
/// value back for everything except `Unset`, which shows as empty text.
/// `Other` prints as JSON so strings stay quoted.
impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::Enum(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Self::Other(v) => write!(f, "{v}"),
            Self::Unset(_) => Ok(()),
        }
    }
}

/// One value extracted from the source text.
///
/// Parameters are treated as immutable snapshots: corrections produce a new
/// parameter list (see [`Snapshot::apply`](crate::Snapshot::apply)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Unique within one extraction result.
    pub name: String,
    pub value: ParameterValue,
    /// Extractor confidence in `[0, 1]`.
    pub confidence: f64,
    /// Literal substring that produced the value. May differ from the span
    /// text when the extractor trims it.
    pub source_text: String,
    pub span: Span,
    pub scope: Scope,
    pub extraction_method: String,
    #[serde(default)]
    pub user_confirmed: bool,
    pub extracted_at: DateTime<Utc>,
    /// Allowed values for `enum` parameters; empty when unconstrained.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl Parameter {
    pub fn data_type(&self) -> DataType {
        self.value.data_type()
    }

    pub fn tier(&self) -> Tier {
        classify(self.confidence)
    }

    /// Included by the panel's "needs review" filter.
    pub fn needs_review(&self) -> bool {
        self.confidence < REVIEW_THRESHOLD || !self.user_confirmed
    }
}

/// Byte offset of the `char_idx`-th character, or `text.len()` past the end.
pub fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// Slice `text` by a character span, clamping to the text bounds.
pub fn slice_chars(text: &str, span: Span) -> &str {
    if span.is_empty() {
        return "";
    }
    let start = char_to_byte(text, span.start);
    let end = char_to_byte(text, span.end);
    &text[start..end.max(start)]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Parameter with sensible defaults for tests across the crate.
    pub(crate) fn param(name: &str, start: usize, end: usize) -> Parameter {
        Parameter {
            name: name.to_string(),
            value: ParameterValue::String(name.to_lowercase()),
            confidence: 0.95,
            source_text: String::new(),
            span: Span::new(start, end),
            scope: Scope::Job,
            extraction_method: "pattern".to_string(),
            user_confirmed: false,
            extracted_at: DateTime::from_timestamp(1_767_225_600, 0).unwrap(),
            choices: Vec::new(),
        }
    }

    #[test]
    fn span_intersects_is_half_open() {
        assert!(Span::new(0, 5).intersects(&Span::new(4, 8)));
        assert!(!Span::new(0, 5).intersects(&Span::new(5, 8)));
        assert!(!Span::new(3, 3).intersects(&Span::new(0, 10)));
    }

    #[test]
    fn span_inverted_counts_as_empty() {
        let s = Span::new(7, 3);
        assert!(s.is_inverted());
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn parse_integer_rejects_fraction() {
        assert_eq!(
            ParameterValue::parse(DataType::Integer, " 42 "),
            Ok(ParameterValue::Integer(42))
        );
        assert!(matches!(
            ParameterValue::parse(DataType::Integer, "12.5"),
            Err(ValueParseError::NotInteger { .. })
        ));
    }

    #[test]
    fn parse_integer_reports_overflow() {
        assert!(matches!(
            ParameterValue::parse(DataType::Integer, "99999999999999999999"),
            Err(ValueParseError::IntegerOutOfRange { .. })
        ));
        assert!(matches!(
            ParameterValue::parse(DataType::Integer, "-99999999999999999999"),
            Err(ValueParseError::IntegerOutOfRange { .. })
        ));
        assert_eq!(
            ParameterValue::parse(DataType::Integer, &i64::MAX.to_string()),
            Ok(ParameterValue::Integer(i64::MAX))
        );
    }

    #[test]
    fn unset_keeps_declared_type() {
        let v = ParameterValue::Unset(DataType::Integer);
        assert_eq!(v.data_type(), DataType::Integer);
        assert_eq!(v.to_string(), "");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json, serde_json::json!({"type": "unset", "value": "integer"}));
        let back: ParameterValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn parse_number_rejects_non_finite() {
        assert_eq!(
            ParameterValue::parse(DataType::Number, "2.5"),
            Ok(ParameterValue::Number(2.5))
        );
        assert!(ParameterValue::parse(DataType::Number, "inf").is_err());
        assert!(ParameterValue::parse(DataType::Number, "NaN").is_err());
    }

    #[test]
    fn parse_boolean_is_literal() {
        assert_eq!(
            ParameterValue::parse(DataType::Boolean, "true"),
            Ok(ParameterValue::Boolean(true))
        );
        assert!(ParameterValue::parse(DataType::Boolean, "yes").is_err());
        assert!(ParameterValue::parse(DataType::Boolean, "True").is_err());
    }

    #[test]
    fn parse_date_iso() {
        let v = ParameterValue::parse(DataType::Date, "2026-03-01").unwrap();
        assert_eq!(v.to_string(), "2026-03-01");
        assert!(ParameterValue::parse(DataType::Date, "01.03.2026").is_err());
    }

    #[test]
    fn parse_other_accepts_json_or_text() {
        assert_eq!(
            ParameterValue::parse(DataType::Other, "[1,2]"),
            Ok(ParameterValue::Other(serde_json::json!([1, 2])))
        );
        assert_eq!(
            ParameterValue::parse(DataType::Other, "free text"),
            Ok(ParameterValue::Other(serde_json::json!("free text")))
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        let values = [
            ParameterValue::String("Foo".into()),
            ParameterValue::Integer(-3),
            ParameterValue::Number(0.25),
            ParameterValue::Boolean(false),
            ParameterValue::Enum("daily".into()),
            ParameterValue::parse(DataType::Date, "2026-03-01").unwrap(),
            ParameterValue::Other(serde_json::json!("5")),
            ParameterValue::Other(serde_json::json!("free text")),
            ParameterValue::Other(serde_json::json!(5)),
            ParameterValue::Other(serde_json::json!({"cron": "0 6 * * *"})),
        ];
        for v in values {
            let text = v.to_string();
            assert_eq!(ParameterValue::parse(v.data_type(), &text).unwrap(), v);
        }
    }

    #[test]
    fn value_json_is_adjacently_tagged() {
        let json = serde_json::to_value(ParameterValue::Integer(5)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "integer", "value": 5}));
    }

    #[test]
    fn parameter_json_defaults() {
        let json = r#"{
            "name": "StreamName",
            "value": {"type": "string", "value": "Foo"},
            "confidence": 0.92,
            "source_text": "Foo",
            "span": {"start": 10, "end": 13},
            "scope": "stream",
            "extraction_method": "pattern",
            "extracted_at": "2026-01-01T00:00:00Z"
        }"#;
        let p: Parameter = serde_json::from_str(json).unwrap();
        assert_eq!(p.scope, Scope::Stream);
        assert!(!p.user_confirmed);
        assert!(p.choices.is_empty());
        assert_eq!(p.data_type(), DataType::String);
    }

    #[test]
    fn needs_review_when_unconfirmed_or_low() {
        let mut p = param("A", 0, 1);
        assert!(p.needs_review());
        p.user_confirmed = true;
        assert!(!p.needs_review());
        p.confidence = 0.69;
        assert!(p.needs_review());
    }

    #[test]
    fn slice_chars_handles_multibyte() {
        let text = "Größe: 5 MB";
        assert_eq!(slice_chars(text, Span::new(0, 5)), "Größe");
        assert_eq!(slice_chars(text, Span::new(7, 99)), "5 MB");
        assert_eq!(slice_chars(text, Span::new(4, 2)), "");
    }
}
