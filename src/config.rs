//! Configuration for the temporal tagging pipeline.
//!
//! The tagger flags mirror the annotation server's property names
//! (`sutime.markTimeRanges`, `sutime.includeRange`, `sutime.language`);
//! the rest configures how the client reaches the server.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SutimeError;

/// Annotator chain the server runs before the temporal tagger.
pub const ANNOTATOR_CHAIN: &str = "tokenize, ssplit, pos, lemma, ner, sutime";

/// Configuration for the temporal tagger client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggerConfig {
    /// Recognize multi-token ranges ("July to August") as a single expression.
    #[serde(default)]
    pub mark_time_ranges: bool,
    /// Attach begin/end range info to recognized expressions.
    #[serde(default)]
    pub include_range: bool,
    /// Grammar language (full name or ISO 639-1 code). Defaults to english.
    #[serde(default)]
    pub language: Option<String>,
    /// Annotation server endpoint (default: http://localhost:9000)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://localhost:9000".to_string()
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            mark_time_ranges: false,
            include_range: false,
            language: None,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TaggerConfig {
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    pub fn with_mark_time_ranges(mut self, enabled: bool) -> Self {
        self.mark_time_ranges = enabled;
        self
    }

    pub fn with_include_range(mut self, enabled: bool) -> Self {
        self.include_range = enabled;
        self
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SutimeError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SutimeError::Construction(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&raw)
            .map_err(|e| SutimeError::Construction(format!("{}: {}", path.display(), e)))
    }

    /// Properties map sent to the annotation server, keyed the way the
    /// server expects them.
    pub fn server_properties(&self, language: &str) -> HashMap<String, String> {
        HashMap::from([
            ("annotators".to_string(), ANNOTATOR_CHAIN.to_string()),
            (
                "sutime.markTimeRanges".to_string(),
                self.mark_time_ranges.to_string(),
            ),
            (
                "sutime.includeRange".to_string(),
                self.include_range.to_string(),
            ),
            ("sutime.language".to_string(), language.to_string()),
            ("ner.useSUTime".to_string(), "true".to_string()),
        ])
    }
}

/// Full names and ISO 639-1 codes accepted for `language`.
static LANGUAGE_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("arabic", "arabic"),
        ("ar", "arabic"),
        ("chinese", "chinese"),
        ("zh", "chinese"),
        ("english", "english"),
        ("british", "british"),
        ("en", "english"),
        ("french", "french"),
        ("fr", "french"),
        ("german", "german"),
        ("de", "german"),
        ("spanish", "spanish"),
        ("es", "spanish"),
    ])
});

/// Languages the temporal grammar actually ships rules for.
const SUPPORTED_LANGUAGES: &[&str] = &["british", "english", "spanish"];

pub const DEFAULT_LANGUAGE: &str = "english";

/// Normalize a caller-supplied language to a grammar name.
///
/// Unknown languages are a construction error. Known languages without a
/// temporal grammar log a warning and fall back to the default grammar.
pub fn normalize_language(language: Option<&str>) -> Result<String, SutimeError> {
    let requested = match language {
        Some(l) if !l.is_empty() => l.to_lowercase(),
        _ => return Ok(DEFAULT_LANGUAGE.to_string()),
    };

    let normalized = LANGUAGE_ALIASES
        .get(requested.as_str())
        .ok_or_else(|| SutimeError::UnsupportedLanguage(requested.clone()))?;

    if !SUPPORTED_LANGUAGES.contains(normalized) {
        warn!(
            "{} is not (yet) supported by the temporal grammar, falling back to {}",
            normalized, DEFAULT_LANGUAGE
        );
        return Ok(DEFAULT_LANGUAGE.to_string());
    }

    Ok(normalized.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TaggerConfig::default();
        assert!(!config.mark_time_ranges);
        assert!(!config.include_range);
        assert!(config.language.is_none());
        assert_eq!(config.endpoint, "http://localhost:9000");
    }

    #[test]
    fn test_builder_methods() {
        let config = TaggerConfig::default()
            .with_endpoint("http://tagger:9000")
            .with_language("es")
            .with_mark_time_ranges(true);
        assert_eq!(config.endpoint, "http://tagger:9000");
        assert_eq!(config.language.as_deref(), Some("es"));
        assert!(config.mark_time_ranges);
        assert!(!config.include_range);
    }

    #[test]
    fn test_config_from_toml() {
        let parsed: TaggerConfig =
            toml::from_str("mark_time_ranges = true\nendpoint = \"http://tagger:9000\"").unwrap();
        assert!(parsed.mark_time_ranges);
        assert!(!parsed.include_range);
        assert_eq!(parsed.endpoint, "http://tagger:9000");
        assert_eq!(parsed.timeout_secs, 120);
    }

    #[test]
    fn test_normalize_language_defaults() {
        assert_eq!(normalize_language(None).unwrap(), "english");
        assert_eq!(normalize_language(Some("")).unwrap(), "english");
    }

    #[test]
    fn test_normalize_language_aliases() {
        assert_eq!(normalize_language(Some("en")).unwrap(), "english");
        assert_eq!(normalize_language(Some("ES")).unwrap(), "spanish");
        assert_eq!(normalize_language(Some("british")).unwrap(), "british");
    }

    #[test]
    fn test_normalize_language_grammarless_falls_back() {
        // Known language without temporal grammar rules
        assert_eq!(normalize_language(Some("de")).unwrap(), "english");
        assert_eq!(normalize_language(Some("chinese")).unwrap(), "english");
    }

    #[test]
    fn test_normalize_language_unknown_rejected() {
        let err = normalize_language(Some("klingon")).unwrap_err();
        assert!(matches!(err, SutimeError::UnsupportedLanguage(l) if l == "klingon"));
    }

    #[test]
    fn test_server_properties() {
        let props = TaggerConfig::default()
            .with_include_range(true)
            .server_properties("english");
        assert_eq!(props["annotators"], ANNOTATOR_CHAIN);
        assert_eq!(props["sutime.markTimeRanges"], "false");
        assert_eq!(props["sutime.includeRange"], "true");
        assert_eq!(props["sutime.language"], "english");
        assert_eq!(props["ner.useSUTime"], "true");
    }
}
