use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use super::{AdviceBackend, AdviceRequest, AdviceResponse, AdvisorError, Citation};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Blocking client for the Generative Language `generateContent` endpoint.
pub struct GeminiBackend {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>) -> Result<Self, AdvisorError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Builds a backend from the first non-empty key variable, if any.
    pub fn from_env() -> Option<Result<Self, AdvisorError>> {
        API_KEY_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty())
            .map(|key| Self::new(key.trim()))
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/{}:generateContent", self.model)
    }
}

fn request_body(request: &AdviceRequest) -> serde_json::Value {
    let mut body = json!({
        "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
        "systemInstruction": { "parts": [{ "text": request.system_instruction }] },
    });
    if request.use_search {
        body["tools"] = json!([{ "google_search": {} }]);
    }
    body
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
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
    web: Option<WebSource>,
}

#[derive(Debug, Default, Deserialize)]
struct WebSource {
    #[serde(default)]
    uri: String,
    #[serde(default)]
    title: String,
}

impl GenerateResponse {
    fn into_advice(self) -> AdviceResponse {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return AdviceResponse::default();
        };
        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        let citations = candidate
            .grounding_metadata
            .map(|meta| {
                meta.grounding_chunks
                    .into_iter()
                    .filter_map(|chunk| chunk.web)
                    .filter(|web| !web.uri.is_empty())
                    .map(|web| Citation {
                        title: web.title,
                        uri: web.uri,
                    })
                    .collect()
            })
            .unwrap_or_default();
        AdviceResponse { text, citations }
    }
}

impl AdviceBackend for GeminiBackend {
    fn generate(&self, request: &AdviceRequest) -> Result<AdviceResponse, AdvisorError> {
        tracing::debug!(model = %self.model, search = request.use_search, "sending advisor request");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(request))
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AdvisorError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let parsed: GenerateResponse = response.json()?;
        Ok(parsed.into_advice())
    }
}

/// Stand-in used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineBackend;

impl AdviceBackend for OfflineBackend {
    fn generate(&self, _request: &AdviceRequest) -> Result<AdviceResponse, AdvisorError> {
        Err(AdvisorError::NotConfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_requests_enable_grounding_tool() {
        let mut request = AdviceRequest::new("price of milk", "be brief");
        assert!(request_body(&request).get("tools").is_none());
        request.use_search = true;
        let body = request_body(&request);
        assert_eq!(body["tools"][0], json!({ "google_search": {} }));
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
    }

    #[test]
    fn response_text_and_citations_are_collected() {
        let raw = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Milk is " }, { "text": "R20." }] },
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "uri": "https://shop.example/milk", "title": "Shop" } },
                    { "retrievedContext": {} }
                ]}
            }]
        });
        let parsed: GenerateResponse = serde_json::from_value(raw).unwrap();
        let advice = parsed.into_advice();
        assert_eq!(advice.text, "Milk is R20.");
        assert_eq!(advice.citations.len(), 1);
        assert_eq!(advice.citations[0].title, "Shop");
    }

    #[test]
    fn empty_candidates_give_empty_text() {
        let parsed: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.into_advice().text.is_empty());
    }

    #[test]
    fn offline_backend_reports_missing_key() {
        let result = OfflineBackend.generate(&AdviceRequest::new("hi", "sys"));
        assert!(matches!(result, Err(AdvisorError::NotConfigured)));
    }
}
