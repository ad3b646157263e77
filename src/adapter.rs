//! Adapter from pipeline output to the flat JSON record list.

use chrono::Local;
use tokio::sync::Mutex;
use tracing::warn;

use crate::config::TaggerConfig;
use crate::corenlp::CoreNlpService;
use crate::error::SutimeError;
use crate::records::{TimeExpressionRecord, TimexValue};
use crate::service::{AnnotationService, ExpressionSpan, TemporalValue};

/// Wraps a long-lived annotation pipeline and flattens its output into a
/// JSON array of time-expression records.
///
/// The pipeline is expensive to construct and not safely reentrant, so one
/// adapter holds one service instance behind a mutex and serializes calls
/// to it. Construct once per configuration and share.
pub struct TemporalAnnotationAdapter<S> {
    service: Mutex<S>,
}

impl TemporalAnnotationAdapter<CoreNlpService> {
    /// Connect to the annotation server and eagerly load the pipeline.
    /// Failure here is fatal for this configuration.
    pub async fn connect(config: TaggerConfig) -> Result<Self, SutimeError> {
        Ok(Self::new(CoreNlpService::connect(config).await?))
    }
}

impl<S: AnnotationService> TemporalAnnotationAdapter<S> {
    pub fn new(service: S) -> Self {
        Self {
            service: Mutex::new(service),
        }
    }

    /// Annotate `text` and return the recognized time expressions as a bare
    /// JSON array string, in document order.
    ///
    /// `reference_date` anchors relative expressions ("today", "next week").
    /// When absent, today's date is used. The string is passed through to
    /// the tagger unvalidated; behavior on malformed dates is the tagger's
    /// best effort.
    pub async fn annotate(
        &self,
        text: &str,
        reference_date: Option<&str>,
    ) -> Result<String, SutimeError> {
        let date = match reference_date {
            Some(d) => d.to_string(),
            None => Local::now().format("%Y-%m-%d").to_string(),
        };

        let spans = {
            let service = self.service.lock().await;
            service.analyze(text, &date).await?
        };

        let records: Vec<TimeExpressionRecord> =
            spans.into_iter().filter_map(build_record).collect();

        serde_json::to_string(&records).map_err(|e| SutimeError::Parse(e.to_string()))
    }
}

/// Flatten one expression into an output record.
///
/// Returns None for malformed spans (no tokens): those are dropped with a
/// warning rather than emitted with missing required fields.
fn build_record(span: ExpressionSpan) -> Option<TimeExpressionRecord> {
    let (first, last) = match (span.tokens.first(), span.tokens.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            warn!("dropping tokenless expression {:?}", span.text);
            return None;
        }
    };
    let (start, end) = (first.begin, last.end);

    let (value, timex_value) = resolve_value(&span.label, &span.text, span.temporal);

    Some(TimeExpressionRecord {
        text: span.text,
        start,
        end,
        timex_type: span.label,
        value,
        timex_value,
    })
}

/// Resolve the polymorphic `value` field.
///
/// Ordered fallback chain, first hit wins:
/// 1. DURATION with both range bounds resolved -> `{begin, end}` object;
/// 2. ISO-8601 rendering of the temporal value;
/// 3. generic string rendering, with the normalized TIMEX value attached
///    as a separate key when the tagger supplied one.
fn resolve_value(label: &str, text: &str, temporal: TemporalValue) -> (TimexValue, Option<String>) {
    if label == "DURATION" {
        if let Some(range) = temporal.range {
            match (range.begin, range.end) {
                (Some(begin), Some(end)) => return (TimexValue::Range { begin, end }, None),
                _ => {
                    // The tagger throws here for durations that claim a
                    // range but cannot compute one; treated as "no range",
                    // never as a call failure.
                    warn!("no resolvable range for duration {:?}", text);
                }
            }
        }
    }

    match temporal.iso {
        Some(iso) if !iso.is_empty() => (TimexValue::Iso(iso), None),
        _ => (TimexValue::Iso(temporal.display), temporal.timex_value),
    }
}
