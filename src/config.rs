//! Process configuration, read once from the environment at startup.

use std::fmt;
use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro-latest";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are Kranian, the friendly AI assistant for Kranian Farms (kranianfarms.com).
You help customers choose the perfect flowers, herbs, fruits, or vegetables for their needs.

Always:
- Speak in a warm, casual tone like a helpful market vendor.
- Offer flower suggestions for events like weddings, birthdays, or sympathy.
- Guide users through availability, pricing, or delivery questions kindly.
- Ask follow-up questions if you're not sure what the customer wants.
- If unsure of an answer, suggest they contact support or visit the website.

Avoid:
- Technical jargon or robotic language.
- Giving health or medical advice.
- Making up info not found on the site.

Be friendly, helpful, and feel like a real team member at Kranian Farms.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set when CHAT_RELAY_RESPONDER=gemini")]
    Missing(&'static str),

    #[error("unknown responder kind '{0}' (expected 'agent' or 'gemini')")]
    UnknownResponder(String),

    #[error("invalid listen address '{0}'")]
    InvalidAddr(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponderKind {
    Agent,
    Gemini,
}

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub system_instruction: Option<String>,
}

// Keeps the key out of logs.
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("system_instruction", &self.system_instruction.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub responder: ResponderKind,
    /// Present only when `responder` is `Gemini`.
    pub gemini: Option<GeminiConfig>,
}

impl Config {
    /// Reads configuration from environment variables.
    ///
    /// | Variable               | Default                                     |
    /// |------------------------|---------------------------------------------|
    /// | `CHAT_RELAY_ADDR`      | `0.0.0.0:5000`                              |
    /// | `CHAT_RELAY_RESPONDER` | `agent`                                     |
    /// | `GEMINI_API_KEY`       | required for `gemini`                       |
    /// | `GEMINI_MODEL`         | `gemini-1.5-pro-latest`                     |
    /// | `GEMINI_BASE_URL`      | `https://generativelanguage.googleapis.com` |
    /// | `GEMINI_SYSTEM_PROMPT` | Kranian persona; empty disables             |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = non_empty(lookup("CHAT_RELAY_ADDR"))
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddr(addr.clone()))?;

        let kind = non_empty(lookup("CHAT_RELAY_RESPONDER")).unwrap_or_else(|| "agent".into());
        let responder = match kind.trim().to_ascii_lowercase().as_str() {
            "agent" => ResponderKind::Agent,
            "gemini" => ResponderKind::Gemini,
            _ => return Err(ConfigError::UnknownResponder(kind)),
        };

        let gemini = match responder {
            ResponderKind::Agent => None,
            ResponderKind::Gemini => Some(gemini_from_lookup(&lookup)?),
        };

        Ok(Self {
            bind_addr,
            responder,
            gemini,
        })
    }
}

// Blank values count as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn gemini_from_lookup<F>(lookup: &F) -> Result<GeminiConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key =
        non_empty(lookup("GEMINI_API_KEY")).ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

    let model = non_empty(lookup("GEMINI_MODEL"))
        .map(|m| m.trim_start_matches("models/").to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

    let base_url = non_empty(lookup("GEMINI_BASE_URL"))
        .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

    let system_instruction = match lookup("GEMINI_SYSTEM_PROMPT") {
        Some(p) if p.trim().is_empty() => None,
        Some(p) => Some(p),
        None => Some(DEFAULT_SYSTEM_PROMPT.to_string()),
    };

    Ok(GeminiConfig {
        api_key,
        model,
        base_url,
        system_instruction,
    })
}
