// src/services/mod.rs
pub mod agent;
pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

/// Failures from whatever produces the reply text.
#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed reply: {0}")]
    MalformedReply(String),

    #[error("agent failed: {0}")]
    Agent(String),
}

/// Something that turns one user message into one reply.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, text: &str) -> Result<String, ResponderError>;

    /// Short label used in logs.
    fn name(&self) -> &'static str;
}
