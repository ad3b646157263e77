//! Client for SUTime-style temporal-expression tagging.
//!
//! A remote annotation server runs the linguistic pipeline (tokenize,
//! sentence-split, POS, lemma, NER, temporal tagger); this crate configures
//! it, sends documents with a reference date, and flattens the recognized
//! time expressions into a JSON array of records.
//!
//! ```no_run
//! use sutime::{TaggerConfig, TemporalAnnotationAdapter};
//!
//! # async fn run() -> Result<(), sutime::SutimeError> {
//! let adapter = TemporalAnnotationAdapter::connect(TaggerConfig::default()).await?;
//! let json = adapter
//!     .annotate("Let's meet next Friday for three days.", Some("2023-01-01"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod corenlp;
pub mod error;
pub mod records;
pub mod service;

pub use adapter::TemporalAnnotationAdapter;
pub use config::TaggerConfig;
pub use corenlp::CoreNlpService;
pub use error::SutimeError;
pub use records::{TimeExpressionRecord, TimexValue};
pub use service::{AnnotationService, ExpressionSpan, TemporalRange, TemporalValue, TokenSpan};
