//! HTTP backend for a CoreNLP-style temporal annotation server.
//!
//! The server hosts the actual linguistic pipeline (tokenizer, sentence
//! splitter, POS tagger, lemmatizer, NER, temporal tagger) and caches
//! pipelines keyed by the properties map. Protocol: `POST /annotate` with
//! `{text, date, properties}` returning the recognized expressions,
//! `GET /ping` for liveness.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{normalize_language, TaggerConfig};
use crate::error::SutimeError;
use crate::service::{AnnotationService, ExpressionSpan, TemporalRange, TemporalValue, TokenSpan};

/// Client for the remote annotation pipeline.
pub struct CoreNlpService {
    config: TaggerConfig,
    language: String,
    client: Client,
}

/// Request format for `POST /annotate`.
#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    text: &'a str,
    date: &'a str,
    properties: &'a HashMap<String, String>,
}

/// Response format for `POST /annotate`.
#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    expressions: Vec<WireExpression>,
}

#[derive(Debug, Deserialize)]
struct WireExpression {
    text: String,
    #[serde(default)]
    tokens: Vec<WireToken>,
    #[serde(rename = "type")]
    label: String,
    #[serde(default)]
    temporal: WireTemporal,
}

#[derive(Debug, Deserialize)]
struct WireToken {
    begin: usize,
    end: usize,
}

#[derive(Debug, Default, Deserialize)]
struct WireTemporal {
    iso: Option<String>,
    #[serde(default)]
    repr: String,
    timex: Option<String>,
    range: Option<WireRange>,
}

#[derive(Debug, Deserialize)]
struct WireRange {
    begin: Option<String>,
    end: Option<String>,
}

impl From<WireExpression> for ExpressionSpan {
    fn from(wire: WireExpression) -> Self {
        ExpressionSpan {
            text: wire.text,
            tokens: wire
                .tokens
                .into_iter()
                .map(|t| TokenSpan {
                    begin: t.begin,
                    end: t.end,
                })
                .collect(),
            label: wire.label,
            temporal: TemporalValue {
                iso: wire.temporal.iso,
                display: wire.temporal.repr,
                timex_value: wire.temporal.timex,
                range: wire.temporal.range.map(|r| TemporalRange {
                    begin: r.begin,
                    end: r.end,
                }),
            },
        }
    }
}

impl CoreNlpService {
    /// Connect to the annotation server and eagerly load the pipeline.
    ///
    /// Model and grammar loading happens server-side on the first request
    /// for a given properties map; the warm-up request here makes that
    /// happen now, so configuration problems (bad grammar, missing models)
    /// fail construction instead of the first `annotate` call.
    pub async fn connect(config: TaggerConfig) -> Result<Self, SutimeError> {
        let language = normalize_language(config.language.as_deref())?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SutimeError::Construction(e.to_string()))?;

        let service = Self {
            config,
            language,
            client,
        };

        info!(
            "loading temporal pipeline at {} (language: {})",
            service.config.endpoint, service.language
        );
        service
            .post_annotate("", "")
            .await
            .map_err(|e| SutimeError::Construction(e.to_string()))?;

        Ok(service)
    }

    /// Check if the annotation server is reachable.
    pub async fn is_available(&self) -> bool {
        Self::ping(&self.config).await
    }

    /// Probe an endpoint without constructing (and warming) a pipeline.
    pub async fn ping(config: &TaggerConfig) -> bool {
        let client = match Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
        {
            Ok(client) => client,
            Err(_) => return false,
        };
        let url = format!("{}/ping", config.endpoint);
        match client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// Grammar language the pipeline was loaded with.
    pub fn language(&self) -> &str {
        &self.language
    }

    async fn post_annotate(
        &self,
        text: &str,
        date: &str,
    ) -> Result<AnnotateResponse, SutimeError> {
        let properties = self.config.server_properties(&self.language);
        let request = AnnotateRequest {
            text,
            date,
            properties: &properties,
        };

        let url = format!("{}/annotate", self.config.endpoint);
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SutimeError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SutimeError::Api(format!("HTTP {}: {}", status, body)));
        }

        resp.json()
            .await
            .map_err(|e| SutimeError::Parse(e.to_string()))
    }
}

#[async_trait]
impl AnnotationService for CoreNlpService {
    async fn analyze(
        &self,
        text: &str,
        reference_date: &str,
    ) -> Result<Vec<ExpressionSpan>, SutimeError> {
        debug!(
            "annotating {} chars (reference date: {})",
            text.len(),
            reference_date
        );
        let response = self.post_annotate(text, reference_date).await?;
        Ok(response.expressions.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_request_shape() {
        let properties = TaggerConfig::default().server_properties("english");
        let request = AnnotateRequest {
            text: "next Friday",
            date: "2023-01-01",
            properties: &properties,
        };
        let json: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(json["text"], "next Friday");
        assert_eq!(json["date"], "2023-01-01");
        assert_eq!(
            json["properties"]["annotators"],
            "tokenize, ssplit, pos, lemma, ner, sutime"
        );
    }

    #[test]
    fn test_parse_response() {
        let raw = r#"{
            "expressions": [
                {
                    "text": "next Friday",
                    "tokens": [{"begin": 11, "end": 15}, {"begin": 16, "end": 22}],
                    "type": "DATE",
                    "temporal": {"iso": "2023-01-06", "repr": "2023-01-06", "timex": null, "range": null}
                },
                {
                    "text": "three days",
                    "tokens": [{"begin": 27, "end": 32}, {"begin": 33, "end": 37}],
                    "type": "DURATION",
                    "temporal": {
                        "iso": "P3D",
                        "repr": "P3D",
                        "range": {"begin": "2023-01-06", "end": "2023-01-09"}
                    }
                }
            ]
        }"#;

        let response: AnnotateResponse = serde_json::from_str(raw).unwrap();
        let spans: Vec<ExpressionSpan> =
            response.expressions.into_iter().map(Into::into).collect();

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].label, "DATE");
        assert_eq!(spans[0].tokens[0].begin, 11);
        assert_eq!(spans[0].temporal.iso.as_deref(), Some("2023-01-06"));

        let range = spans[1].temporal.range.as_ref().unwrap();
        assert_eq!(range.begin.as_deref(), Some("2023-01-06"));
        assert_eq!(range.end.as_deref(), Some("2023-01-09"));
    }

    #[test]
    fn test_parse_response_missing_fields() {
        // A span the tagger could not normalize: no iso, no range, no tokens
        let raw = r#"{"expressions": [{"text": "soon", "type": "DATE", "temporal": {"repr": "soon"}}]}"#;
        let response: AnnotateResponse = serde_json::from_str(raw).unwrap();
        let span: ExpressionSpan = response.expressions.into_iter().next().unwrap().into();
        assert!(span.tokens.is_empty());
        assert!(span.temporal.iso.is_none());
        assert_eq!(span.temporal.display, "soon");
    }

    #[test]
    fn test_parse_empty_response() {
        let response: AnnotateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.expressions.is_empty());
    }
}
