use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::http_client::http_client;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Fallback order: most to least capable identifier still worth trying.
pub const MODEL_TIERS: &[ModelTier] = &[
    ModelTier {
        id: "gemini-2.0-flash",
        capability: "primary",
    },
    ModelTier {
        id: "gemini-1.5-pro",
        capability: "capable fallback",
    },
    ModelTier {
        id: "gemini-1.5-flash",
        capability: "last resort",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelTier {
    pub id: &'static str,
    pub capability: &'static str,
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Attach the hosted search tool so the model can pull fresh news.
    pub enable_search: bool,
}

/// Seam between the fallback loop and the transport, so the loop can be
/// driven by scripted fakes in tests.
pub trait TextGenerator {
    fn generate(&self, model_id: &str, request: &GenerateRequest) -> Result<String>;
}

/// Holds the key explicitly; callers construct one from their config rather
/// than configuring a process-wide default.
pub struct GeminiClient {
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, model_id: &str, request: &GenerateRequest) -> Result<String> {
        let client = http_client()?;
        let url = format!(
            "{GEMINI_BASE_URL}/{model_id}:generateContent?key={}",
            self.api_key
        );
        let body = GenerateBody::from_request(request);
        let resp = client
            .post(&url)
            .json(&body)
            .send()
            .with_context(|| format!("generate request failed for {model_id}"))?;
        let status = resp.status();
        let text = resp.text().context("failed reading model response body")?;
        if !status.is_success() {
            anyhow::bail!("model {model_id} http {status}: {text}");
        }
        let parsed: GenerateResponse =
            serde_json::from_str(&text).context("invalid model response json")?;
        parsed
            .first_text()
            .with_context(|| format!("model {model_id} returned no text"))
    }
}

#[derive(Debug, Serialize)]
struct GenerateBody {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
}

impl GenerateBody {
    fn from_request(request: &GenerateRequest) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: request.prompt.clone(),
                }],
            }],
            tools: request
                .enable_search
                .then(|| vec![Tool { google_search: SearchTool {} }]),
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: SearchTool,
}

#[derive(Debug, Serialize)]
struct SearchTool {}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let joined: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Drop a wrapping markdown code fence, info string included.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.split_once('\n').map(|(_, tail)| tail).unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Slice from the first '[' to the last ']' so prose around the array is
/// ignored. Returns None when no plausible array is present.
pub fn extract_json_array(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}
