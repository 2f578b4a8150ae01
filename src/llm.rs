use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::GenerationConfig;

/// Sampling temperature shared by every stage so a given prompt stays reproducible.
pub const TEMPERATURE: f32 = 0.4;

/// Substituted when the backend answers with no text at all.
pub const EMPTY_TEXT_FALLBACK: &str = "No data retrieved.";

/// Title used for web citations that come back without one.
pub const UNTITLED_SOURCE: &str = "Verified Source";

/// A grounding citation. `uri` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Output of a single generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResult {
    pub text: String,
    pub sources: Vec<Source>,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API key is missing (set GEMINI_API_KEY)")]
    MissingCredential,
    #[error("generation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generation backend returned {status}: {message}")]
    Backend { status: u16, message: String },
    #[error("malformed generation response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// One call to a hosted text-generation model.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        use_search: bool,
    ) -> Result<StageResult, GenerationError>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    config: GenerationConfig,
}

impl GeminiClient {
    /// No request timeout is set: a stalled backend stalls the run.
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn has_credential(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Resolve the generateContent endpoint from the base URL.
    fn endpoint(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{}/models/{}:generateContent", base, self.config.model)
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        use_search: bool,
    ) -> Result<StageResult, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        let body = request_body(prompt, system_instruction, use_search);
        debug!(
            model = %self.config.model,
            use_search,
            prompt_len = prompt.len(),
            "generateContent request"
        );

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(GenerationError::Backend {
                status: status.as_u16(),
                message: backend_error_message(&text),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)?;
        let result = StageResult::from_response(parsed);
        debug!(
            text_len = result.text.len(),
            source_count = result.sources.len(),
            "generateContent response"
        );
        Ok(result)
    }
}

/// Build the JSON body for a generateContent call.
fn request_body(prompt: &str, system_instruction: &str, use_search: bool) -> serde_json::Value {
    let mut body = serde_json::json!({
        "systemInstruction": { "parts": [{ "text": system_instruction }] },
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": { "temperature": TEMPERATURE },
    });
    if use_search {
        body["tools"] = serde_json::json!([{ "googleSearch": {} }]);
    }
    body
}

/// Pull `error.message` out of a Google API error envelope, falling back to the raw body.
fn backend_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
    /// Thinking models tag reasoning parts; they are not answer text.
    #[serde(default)]
    thought: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct WebChunk {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl StageResult {
    fn from_response(resp: GenerateContentResponse) -> Self {
        let Some(candidate) = resp.candidates.into_iter().next() else {
            return Self {
                text: EMPTY_TEXT_FALLBACK.to_string(),
                sources: vec![],
            };
        };

        let text: String = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter(|p| p.thought != Some(true))
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();
        let text = if text.is_empty() {
            EMPTY_TEXT_FALLBACK.to_string()
        } else {
            text
        };

        let sources = candidate
            .grounding_metadata
            .map(|m| {
                m.grounding_chunks
                    .into_iter()
                    .filter_map(|chunk| {
                        let web = chunk.web?;
                        let uri = web.uri?;
                        let title = web
                            .title
                            .filter(|t| !t.is_empty())
                            .unwrap_or_else(|| UNTITLED_SOURCE.to_string());
                        Some(Source { title, uri })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { text, sources }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> StageResult {
        StageResult::from_response(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_text_parts_concatenated() {
        let result = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello, "},{"text":"world"}]}}]}"#,
        );
        assert_eq!(result.text, "Hello, world");
        assert!(result.sources.is_empty());
    }

    #[test]
    fn test_thought_parts_skipped() {
        let result = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"pondering","thought":true},{"text":"answer"}]}}]}"#,
        );
        assert_eq!(result.text, "answer");
    }

    #[test]
    fn test_empty_payload_falls_back() {
        assert_eq!(parse(r#"{}"#).text, EMPTY_TEXT_FALLBACK);
        assert_eq!(parse(r#"{"candidates":[]}"#).text, EMPTY_TEXT_FALLBACK);
        assert_eq!(
            parse(r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#).text,
            EMPTY_TEXT_FALLBACK
        );
    }

    #[test]
    fn test_grounding_web_chunks() {
        let result = parse(
            r#"{"candidates":[{
                "content":{"parts":[{"text":"x"}]},
                "groundingMetadata":{"groundingChunks":[
                    {"web":{"uri":"https://a.example/1","title":"Port news"}},
                    {"retrievedContext":{"uri":"gs://bucket/doc"}},
                    {"web":{"uri":"https://b.example/2"}},
                    {"web":{"title":"no uri"}}
                ]}
            }]}"#,
        );
        assert_eq!(
            result.sources,
            vec![
                Source {
                    title: "Port news".to_string(),
                    uri: "https://a.example/1".to_string(),
                },
                Source {
                    title: UNTITLED_SOURCE.to_string(),
                    uri: "https://b.example/2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_request_body_search_toggle() {
        let with = request_body("p", "sys", true);
        assert_eq!(with["tools"][0]["googleSearch"], serde_json::json!({}));
        assert_eq!(with["contents"][0]["parts"][0]["text"], "p");
        assert_eq!(with["systemInstruction"]["parts"][0]["text"], "sys");

        let without = request_body("p", "sys", false);
        assert!(without.get("tools").is_none());
        assert_eq!(
            without["generationConfig"]["temperature"].as_f64().unwrap() as f32,
            TEMPERATURE
        );
    }

    #[test]
    fn test_backend_error_message() {
        let body = r#"{"error":{"code":403,"message":"API key not valid.","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(backend_error_message(body), "API key not valid.");
        assert_eq!(backend_error_message(" upstream timeout \n"), "upstream timeout");
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(GenerationConfig {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://example.test/v1beta/".to_string(),
        })
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_credential_before_network() {
        // Unroutable base URL: reaching the network would surface as Transport instead.
        let client = GeminiClient::new(GenerationConfig {
            api_key: None,
            model: "m".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
        })
        .unwrap();
        let err = client.generate("p", "s", true).await.unwrap_err();
        assert!(matches!(err, GenerationError::MissingCredential));
    }
}
