use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};

// --- Config ---

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpeechConfig {
    #[serde(default = "default_speech_provider")]
    pub provider: String, // "http" or "none"
    pub http: Option<http::HttpSpeechConfig>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            provider: default_speech_provider(),
            http: None,
        }
    }
}

fn default_speech_provider() -> String {
    "none".to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Speech {
    pub url: String,
}

#[async_trait]
pub trait SpeechClient: Send + Sync {
    /// `Ok(None)` means the service produced nothing to play.
    async fn synthesize(&self, transcript: &str, voice_id: Option<&str>) -> Result<Option<Speech>>;
}

/// Used when no speech provider is configured; every entry keeps an empty URL.
pub struct DisabledSpeechClient;

#[async_trait]
impl SpeechClient for DisabledSpeechClient {
    async fn synthesize(&self, _transcript: &str, _voice_id: Option<&str>) -> Result<Option<Speech>> {
        Ok(None)
    }
}

pub fn create_speech_client(config: &SpeechConfig) -> Result<Box<dyn SpeechClient>> {
    info!("Initializing speech client for provider: {}", config.provider);
    match config.provider.as_str() {
        "none" => Ok(Box::new(DisabledSpeechClient)),
        "http" => {
            let http_config = config
                .http
                .clone()
                .context("HTTP speech config missing")?;
            Ok(Box::new(http::HttpSpeechClient::new(http_config)?))
        }
        _ => Err(anyhow!("Unknown speech provider: {}", config.provider)),
    }
}

pub mod http;
