//! Gemini `generateContent` client used as the statement extractor.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use ledgerlift_core::ExtractionResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::extractor::StatementExtractor;
use crate::payload::decode_payload;
use crate::prompt::{response_schema, SYSTEM_INSTRUCTION, USER_PROMPT};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub base_url: String,
    pub model: String,
    pub request_timeout: Duration,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    Text(&'a str),
    InlineData {
        #[serde(rename = "mimeType")]
        mime_type: &'a str,
        data: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    settings: GeminiSettings,
    client: reqwest::Client,
}

impl GeminiClient {
    /// A client without a key is valid; every call then fails with
    /// `MissingCredential` before touching the network.
    pub fn new(api_key: Option<String>, settings: GeminiSettings) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            settings,
            client,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    /// Send one document and return the model's JSON text.
    async fn generate(&self, key: &str, document: &[u8], mime_type: &str) -> Result<String, ExtractionError> {
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::Text(SYSTEM_INSTRUCTION)],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![
                    Part::InlineData {
                        mime_type,
                        data: BASE64.encode(document),
                    },
                    Part::Text(USER_PROMPT),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(ExtractionError::Api {
                status: status.as_u16(),
                body: txt,
            });
        }

        let out: GenerateResponse = resp.json().await?;
        let text: String = out
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl StatementExtractor for GeminiClient {
    async fn extract(
        &self,
        document: &[u8],
        mime_type: &str,
    ) -> Result<ExtractionResult, ExtractionError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ExtractionError::MissingCredential)?;

        debug!(model = %self.settings.model, mime_type, bytes = document.len(), "sending document");
        let text = self.generate(key, document, mime_type).await?;
        let result = decode_payload(&text)?;
        info!(
            bank = %result.bank,
            transactions = result.transactions.len(),
            "statement extracted"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::Text("sys")],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![
                    Part::InlineData {
                        mime_type: "application/pdf",
                        data: BASE64.encode(b"%PDF-1.4"),
                    },
                    Part::Text("go"),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: Value::Null,
            },
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["systemInstruction"]["parts"][0]["text"], "sys");
        assert!(v["systemInstruction"].get("role").is_none());
        assert_eq!(v["contents"][0]["role"], "user");
        assert_eq!(v["contents"][0]["parts"][0]["inlineData"]["mimeType"], "application/pdf");
        assert_eq!(v["contents"][0]["parts"][0]["inlineData"]["data"], "JVBERi0xLjQ=");
        assert_eq!(v["contents"][0]["parts"][1]["text"], "go");
        assert_eq!(v["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let c = GeminiClient::new(Some("   ".into()), GeminiSettings::default()).unwrap();
        assert!(!c.has_credential());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let settings = GeminiSettings {
            base_url: "http://localhost:9999/".into(),
            model: "m".into(),
            ..GeminiSettings::default()
        };
        let c = GeminiClient::new(None, settings).unwrap();
        assert_eq!(c.endpoint(), "http://localhost:9999/v1beta/models/m:generateContent");
    }
}
