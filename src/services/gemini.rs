// src/services/gemini.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Responder, ResponderError};
use crate::config::GeminiConfig;

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
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
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Single-turn `generateContent` client.
pub struct GeminiResponder {
    client: Client,
    config: GeminiConfig,
}

impl GeminiResponder {
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

fn extract_text(reply: GenerateContentResponse) -> Result<String, ResponderError> {
    let candidate = reply
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ResponderError::MalformedReply("no candidates".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.is_empty() {
        return Err(ResponderError::MalformedReply(
            "candidate has no text".to_string(),
        ));
    }
    Ok(text)
}

#[async_trait]
impl Responder for GeminiResponder {
    async fn respond(&self, text: &str) -> Result<String, ResponderError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text }],
            }],
            system_instruction: self.config.system_instruction.as_deref().map(|s| Content {
                role: None,
                parts: vec![Part { text: s }],
            }),
        };

        tracing::debug!(model = %self.config.model, "calling generateContent");

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ResponderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| ResponderError::MalformedReply(e.to_string()))?;

        extract_text(reply)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
