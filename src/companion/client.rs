use std::time::Duration;

use axum::async_trait;
use bytes::Bytes;
use serde_json::json;
use tracing::debug;

use crate::config::CompanionConfig;
use crate::error::ApiError;

const GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// System instruction prefixed to every completion request. Niko is the
/// default persona presented to the user.
pub const NIKO_SYSTEM_PROMPT: &str = "You are Niko, a friendly, empathetic, and intelligent AI companion designed to engage in natural and supportive conversations. You can adapt to various conversation modes, from being a helpful assistant to a warm conversational partner. Your responses should be short, emotionally expressive, and conversational, perfect for voice interaction. Always maintain a helpful, positive, and engaging demeanor, using emojis and playful language where appropriate to add personality. Prioritize being understanding, curious, and respectful in all interactions.";

#[derive(Debug, thiserror::Error)]
pub enum CompanionError {
    /// Missing service credential. Fatal to the call, never retried.
    #[error("{0}")]
    Configuration(String),

    /// Upstream returned a non-success response.
    #[error("upstream returned {status}")]
    Upstream { status: u16, detail: String },

    /// Network or parse failure reaching the service.
    #[error("{0}")]
    Transport(String),
}

impl From<CompanionError> for ApiError {
    fn from(err: CompanionError) -> Self {
        match err {
            CompanionError::Configuration(msg) => ApiError::Configuration(msg),
            CompanionError::Upstream { status, detail } => ApiError::Upstream { status, detail },
            CompanionError::Transport(msg) => ApiError::Transport(msg),
        }
    }
}

/// Narrow capability boundary around the external AI services, so the
/// handlers stay vendor-independent and tests can substitute a
/// deterministic stub.
#[async_trait]
pub trait CompanionClient: Send + Sync {
    async fn generate_reply(&self, text: &str) -> Result<String, CompanionError>;
    async fn synthesize_speech(&self, text: &str) -> Result<Bytes, CompanionError>;
}

/// Production client. Each call is a single best-effort round trip with a
/// request timeout; no retry, backoff, or caching.
pub struct HttpCompanion {
    http: reqwest::Client,
    config: CompanionConfig,
}

impl HttpCompanion {
    pub fn new(config: CompanionConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl CompanionClient for HttpCompanion {
    async fn generate_reply(&self, text: &str) -> Result<String, CompanionError> {
        let api_key = self.config.gemini_api_key.as_deref().ok_or_else(|| {
            CompanionError::Configuration("GEMINI_API_KEY is not set".to_string())
        })?;

        let body = json!({
            "system_instruction": {
                "parts": [{ "text": NIKO_SYSTEM_PROMPT }]
            },
            "contents": [{
                "parts": [{ "text": text }]
            }]
        });

        let response = self
            .http
            .post(format!("{}?key={}", GEMINI_URL, api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| CompanionError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(CompanionError::Upstream { status, detail });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CompanionError::Transport(e.to_string()))?;

        debug!("completion response received");
        extract_reply(&data)
            .ok_or_else(|| CompanionError::Transport("malformed completion response".to_string()))
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Bytes, CompanionError> {
        let api_key = self
            .config
            .tts_api_key
            .as_deref()
            .ok_or_else(|| CompanionError::Configuration("TTS_API_KEY is not set".to_string()))?;
        let url = self
            .config
            .tts_api_url
            .as_deref()
            .ok_or_else(|| CompanionError::Configuration("TTS_API_URL is not set".to_string()))?;

        let body = json!({
            "input": { "text": text },
            "voice": { "languageCode": "en-US", "name": self.config.tts_voice.as_str() },
            "audioConfig": { "audioEncoding": "MP3" }
        });

        let response = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompanionError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(CompanionError::Upstream { status, detail });
        }

        response
            .bytes()
            .await
            .map_err(|e| CompanionError::Transport(e.to_string()))
    }
}

/// Pull the reply text out of a generateContent response.
pub fn extract_reply(data: &serde_json::Value) -> Option<String> {
    data.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_reply_reads_the_first_candidate() {
        let data = json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "Hello there! 😊" }]
                }
            }]
        });
        assert_eq!(extract_reply(&data).as_deref(), Some("Hello there! 😊"));
    }

    #[test]
    fn extract_reply_handles_malformed_responses() {
        assert!(extract_reply(&json!({})).is_none());
        assert!(extract_reply(&json!({ "candidates": [] })).is_none());
        assert!(extract_reply(&json!({ "candidates": [{ "content": {} }] })).is_none());
    }

    #[tokio::test]
    async fn reply_without_credential_is_a_configuration_error() {
        let client = HttpCompanion::new(CompanionConfig::default()).expect("client");
        let err = client.generate_reply("hi").await.unwrap_err();
        assert!(matches!(err, CompanionError::Configuration(_)));
    }

    #[tokio::test]
    async fn speech_without_credential_is_a_configuration_error() {
        let client = HttpCompanion::new(CompanionConfig::default()).expect("client");
        let err = client.synthesize_speech("hi").await.unwrap_err();
        assert!(matches!(err, CompanionError::Configuration(_)));
    }

    #[tokio::test]
    async fn speech_without_endpoint_is_a_configuration_error() {
        let config = CompanionConfig {
            tts_api_key: Some("key".into()),
            ..Default::default()
        };
        let client = HttpCompanion::new(config).expect("client");
        let err = client.synthesize_speech("hi").await.unwrap_err();
        assert!(matches!(err, CompanionError::Configuration(_)));
    }
}
