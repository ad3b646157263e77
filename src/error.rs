//! Error taxonomy for the tagging client.

use thiserror::Error;

/// Errors surfaced to callers of the adapter.
///
/// Construction-time failures (`Construction`, `UnsupportedLanguage`) are
/// fatal for the configuration that produced them; retrying with the same
/// configuration will not help. Per-expression anomalies are absorbed
/// inside `annotate` and never appear here.
#[derive(Debug, Error)]
pub enum SutimeError {
    #[error("pipeline construction failed: {0}")]
    Construction(String),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("annotation server error: {0}")]
    Api(String),

    #[error("failed to parse server response: {0}")]
    Parse(String),
}
