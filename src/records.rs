//! Output records for recognized time expressions.

use serde::{Deserialize, Serialize};

/// Resolved value of a time expression.
///
/// DURATION expressions with a computable range serialize as a
/// `{begin, end}` object; everything else serializes as a plain string
/// (ISO-8601 when the expression normalizes, an opaque rendering when it
/// does not).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimexValue {
    Range { begin: String, end: String },
    Iso(String),
}

/// One recognized time expression, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeExpressionRecord {
    /// Surface form of the matched span.
    pub text: String,
    /// Character offset of the first token's start.
    pub start: usize,
    /// Character offset of the last token's end.
    pub end: usize,
    /// Tagger category label (DATE, TIME, DURATION, SET, ...), verbatim.
    #[serde(rename = "type")]
    pub timex_type: String,
    pub value: TimexValue,
    /// Normalized TIMEX value (e.g. "2016-Q4") when the expression has one
    /// but does not normalize to ISO-8601. Never present alongside a range.
    #[serde(rename = "timex-value", default, skip_serializing_if = "Option::is_none")]
    pub timex_value: Option<String>,
}
