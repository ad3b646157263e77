//! Annotation service abstraction.
//!
//! The temporal reasoning engine is an external collaborator. This trait is
//! the seam between the adapter's record-building logic and whatever backend
//! actually runs the linguistic pipeline, so the adapter can be exercised
//! against a scripted fake in tests.

use async_trait::async_trait;

use crate::error::SutimeError;

/// A backend that can run the temporal tagging pipeline over a document.
#[async_trait]
pub trait AnnotationService: Send + Sync {
    /// Analyze `text` with relative expressions anchored to `reference_date`
    /// (a `yyyy-MM-dd`-style string, passed through to the tagger as-is).
    ///
    /// Returns recognized expressions in document order; an empty list means
    /// the tagger found nothing, which is not an error.
    async fn analyze(
        &self,
        text: &str,
        reference_date: &str,
    ) -> Result<Vec<ExpressionSpan>, SutimeError>;
}

/// Character offsets of one constituent token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub begin: usize,
    pub end: usize,
}

/// One recognized expression as reported by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionSpan {
    /// Raw rendering of the matched span.
    pub text: String,
    /// Constituent tokens in order. A well-formed span has at least one.
    pub tokens: Vec<TokenSpan>,
    /// Tagger category label (DATE, TIME, DURATION, SET, ...).
    pub label: String,
    pub temporal: TemporalValue,
}

/// The tagger's resolved temporal object for an expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemporalValue {
    /// ISO-8601 rendering, when the expression normalizes.
    pub iso: Option<String>,
    /// Generic string rendering; always present, used as last resort.
    pub display: String,
    /// Normalized TIMEX value string (e.g. "2016-Q4"), when distinct
    /// from the ISO rendering.
    pub timex_value: Option<String>,
    /// Begin/end range, when the tagger computed one.
    pub range: Option<TemporalRange>,
}

/// A temporal range whose bounds may individually fail to resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemporalRange {
    pub begin: Option<String>,
    pub end: Option<String>,
}
