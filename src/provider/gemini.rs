//! Gemini Provider
//!
//! Talks to the Gemini `generateContent` endpoint with a strict response
//! schema so the model is forced to emit the exact timeline shape. The
//! prompt, system instruction, and schema are fixed at compile time; only
//! credentials and endpoint come from the environment.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{FetchOutcome, ProviderError, TimelineProvider};
use crate::model::Timeline;

/// Default model used for timeline generation
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default API base
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The one request this application ever makes
const TIMELINE_PROMPT: &str = "Generate a chronological timeline of the history of \
Legal Philosophy (Jurisprudence). Include 12 major figures from ancient times (like \
Plato/Aristotle) through the Middle Ages (Aquinas) to Modernity (Hobbes, Locke, Kant) \
and contemporary times (Hart, Dworkin, Fuller). Ensure a diverse representation of \
schools like Natural Law, Positivism, Realism, and Interpretivism. The output must be \
strictly in Chinese (Simplified) for the content, but keys in English.";

/// Role framing for the model
const SYSTEM_INSTRUCTION: &str = "You are an expert Professor of Jurisprudence. \
Provide accurate, academic, yet accessible summaries of legal theories.";

/// Connection configuration, resolved once at startup
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API key; absence becomes `ProviderError::MissingApiKey` at call time
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// API base URL (overridable for tests and proxies)
    pub base_url: String,
}

impl GeminiConfig {
    /// Read configuration from the environment.
    ///
    /// `GEMINI_API_KEY` (or legacy `API_KEY`) supplies the credential;
    /// `GEMINI_MODEL` and `GEMINI_BASE_URL` override the defaults.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.is_empty());
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self {
            api_key,
            model,
            base_url,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Gemini-backed timeline provider
pub struct GeminiProvider {
    config: GeminiConfig,
    http_client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new provider
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Create a provider configured from the environment
    pub fn from_env() -> Self {
        Self::new(GeminiConfig::from_env())
    }

    /// Get the generateContent endpoint URL
    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    /// Build the request body: prompt, role framing, and the strict schema
    fn request_body(&self) -> Value {
        json!({
            "contents": [{
                "parts": [{ "text": TIMELINE_PROMPT }]
            }],
            "systemInstruction": {
                "parts": [{ "text": SYSTEM_INSTRUCTION }]
            },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            }
        })
    }
}

#[async_trait]
impl TimelineProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn request_timeline(&self) -> FetchOutcome {
        // Credential check happens before any network traffic
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey)?;

        tracing::debug!(model = %self.config.model, "requesting timeline");

        let response = self
            .http_client
            .post(self.generate_url())
            .header("x-goog-api-key", api_key)
            .json(&self.request_body())
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        parse_response(&body)
    }
}

/// JSON schema the provider must satisfy, mirrored by [`crate::model`]
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "philosophers": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "INTEGER" },
                        "name": { "type": "STRING" },
                        "years": {
                            "type": "STRING",
                            "description": "Lifespan or active period, e.g., '384–322 BC'"
                        },
                        "schoolOfThought": {
                            "type": "STRING",
                            "description": "e.g., Natural Law, Legal Positivism"
                        },
                        "shortSummary": {
                            "type": "STRING",
                            "description": "A brief 1-sentence overview."
                        },
                        "detailedTheory": {
                            "type": "STRING",
                            "description": "A comprehensive paragraph (approx 100 words) explaining their legal philosophy."
                        },
                        "majorWorks": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        },
                        "keyQuotes": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "description": "1 or 2 famous quotes related to law."
                        }
                    },
                    "required": [
                        "id", "name", "years", "schoolOfThought", "shortSummary",
                        "detailedTheory", "majorWorks", "keyQuotes"
                    ]
                }
            }
        },
        "required": ["philosophers"]
    })
}

/// Parse a raw generateContent response body into a validated timeline.
///
/// Pure function so the whole response contract is testable without a
/// network. Failure taxonomy:
/// - empty body or no candidate text -> `EmptyResponse`
/// - invalid JSON anywhere, or a record missing a required field -> `Parse`
pub fn parse_response(body: &str) -> FetchOutcome {
    if body.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }

    let envelope: Value =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let text = envelope
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }

    let timeline: Timeline =
        serde_json::from_str(text).map_err(|e| ProviderError::Parse(e.to_string()))?;

    // serde enforces presence; non-empty display names are on us
    if let Some(figure) = timeline.philosophers.iter().find(|p| p.name.is_empty()) {
        return Err(ProviderError::Parse(format!(
            "figure id={} has an empty name",
            figure.id
        )));
    }

    Ok(timeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Wrap a payload string in a minimal generateContent envelope
    fn envelope(payload: &str) -> String {
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": payload }] }
            }]
        })
        .to_string()
    }

    fn two_figure_payload() -> String {
        json!({
            "philosophers": [
                {
                    "id": 1,
                    "name": "Plato",
                    "years": "c. 428–348 BC",
                    "schoolOfThought": "Natural Law",
                    "shortSummary": "Justice as harmony of the soul and the city.",
                    "detailedTheory": "Law approximates the Form of Justice.",
                    "majorWorks": ["Republic", "Laws"],
                    "keyQuotes": ["Justice means minding one's own business."]
                },
                {
                    "id": 2,
                    "name": "H. L. A. Hart",
                    "years": "1907–1992",
                    "schoolOfThought": "Legal Positivism",
                    "shortSummary": "Law as a union of primary and secondary rules.",
                    "detailedTheory": "Hart rebuilt positivism around social rules.",
                    "majorWorks": ["The Concept of Law"],
                    "keyQuotes": []
                }
            ]
        })
        .to_string()
    }

    // ========================================================================
    // Happy Path
    // ========================================================================

    #[test]
    fn test_parse_valid_response_preserves_order_and_fields() {
        let timeline = parse_response(&envelope(&two_figure_payload())).unwrap();

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.get(0).unwrap().name, "Plato");
        assert_eq!(timeline.get(0).unwrap().major_works, vec!["Republic", "Laws"]);
        assert_eq!(timeline.get(1).unwrap().name, "H. L. A. Hart");
        assert_eq!(timeline.get(1).unwrap().school_of_thought, "Legal Positivism");
        assert!(timeline.get(1).unwrap().key_quotes.is_empty());
    }

    #[test]
    fn test_parse_empty_philosophers_is_accepted() {
        // Any schema-valid count is acceptable, including zero
        let timeline = parse_response(&envelope(r#"{"philosophers": []}"#)).unwrap();
        assert!(timeline.is_empty());
    }

    // ========================================================================
    // Failure Taxonomy
    // ========================================================================

    #[test]
    fn test_parse_empty_body_is_empty_response() {
        assert!(matches!(
            parse_response(""),
            Err(ProviderError::EmptyResponse)
        ));
        assert!(matches!(
            parse_response("   \n"),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_no_candidates_is_empty_response() {
        assert!(matches!(
            parse_response(r#"{"candidates": []}"#),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_blank_candidate_text_is_empty_response() {
        assert!(matches!(
            parse_response(&envelope("  ")),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_invalid_envelope_is_parse_error() {
        assert!(matches!(
            parse_response("not json at all"),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_invalid_payload_is_parse_error() {
        assert!(matches!(
            parse_response(&envelope("{ broken")),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_missing_required_field_is_total_failure() {
        // One record lacking detailedTheory poisons the whole dataset
        let payload = json!({
            "philosophers": [
                {
                    "id": 1,
                    "name": "Aquinas",
                    "years": "1225–1274",
                    "schoolOfThought": "Natural Law",
                    "shortSummary": "An unjust law is no law at all.",
                    "majorWorks": ["Summa Theologiae"],
                    "keyQuotes": []
                }
            ]
        })
        .to_string();

        assert!(matches!(
            parse_response(&envelope(&payload)),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_empty_name_is_parse_error() {
        let payload = json!({
            "philosophers": [
                {
                    "id": 7,
                    "name": "",
                    "years": "n/a",
                    "schoolOfThought": "Realism",
                    "shortSummary": "s",
                    "detailedTheory": "d",
                    "majorWorks": [],
                    "keyQuotes": []
                }
            ]
        })
        .to_string();

        assert!(matches!(
            parse_response(&envelope(&payload)),
            Err(ProviderError::Parse(_))
        ));
    }

    // ========================================================================
    // Request Construction
    // ========================================================================

    #[test]
    fn test_generate_url_uses_configured_model_and_base() {
        let provider = GeminiProvider::new(GeminiConfig {
            api_key: Some("k".to_string()),
            model: "gemini-2.5-flash".to_string(),
            base_url: "http://localhost:9090/v1beta".to_string(),
        });
        assert_eq!(
            provider.generate_url(),
            "http://localhost:9090/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_carries_schema_and_instruction() {
        let provider = GeminiProvider::new(GeminiConfig::default());
        let body = provider.request_body();

        assert_eq!(
            body.pointer("/generationConfig/responseMimeType")
                .and_then(Value::as_str),
            Some("application/json")
        );
        let required = body
            .pointer("/generationConfig/responseSchema/required")
            .unwrap();
        assert_eq!(required[0], "philosophers");
        assert!(body
            .pointer("/systemInstruction/parts/0/text")
            .and_then(Value::as_str)
            .unwrap()
            .contains("Professor of Jurisprudence"));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        // base_url points nowhere routable; the call must fail on the
        // credential check, not on a connection attempt
        let provider = GeminiProvider::new(GeminiConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: "http://127.0.0.1:1".to_string(),
        });

        assert!(matches!(
            provider.request_timeline().await,
            Err(ProviderError::MissingApiKey)
        ));
    }
}
