use crate::services::tts::{Speech, SpeechClient};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpSpeechConfig {
    pub base_url: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice: Option<&'a str>,
}

#[derive(Deserialize)]
struct SynthesisResponse {
    #[serde(default)]
    url: Option<String>,
}

pub struct HttpSpeechClient {
    base_url: Url,
    token: String,
    client: reqwest::Client,
}

impl HttpSpeechClient {
    pub fn new(config: HttpSpeechConfig) -> Result<Self> {
        // A trailing slash keeps `join` from replacing the last path segment.
        let mut base = config.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)
            .with_context(|| format!("Invalid speech base_url: {}", config.base_url))?;
        Ok(Self {
            base_url,
            token: config.token,
            client: reqwest::Client::new(),
        })
    }

    /// Servers may answer with a path relative to themselves.
    fn resolve_url(&self, raw: &str) -> Result<Option<String>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        let url = self.base_url.join(raw)?;
        Ok(Some(url.to_string()))
    }
}

#[async_trait]
impl SpeechClient for HttpSpeechClient {
    async fn synthesize(&self, transcript: &str, voice_id: Option<&str>) -> Result<Option<Speech>> {
        let endpoint = self.base_url.join("synthesize")?;
        let payload = SynthesisRequest { text: transcript, voice: voice_id };

        let mut req = self.client.post(endpoint).json(&payload);
        if !self.token.is_empty() {
            req = req.header("Authorization", format!("Bearer {}", self.token));
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            let txt = resp.text().await?;
            return Err(anyhow!("Speech synthesis failed: {}", txt));
        }

        let body: SynthesisResponse = resp.json().await?;
        let Some(raw) = body.url else {
            debug!("Speech service returned no url");
            return Ok(None);
        };
        Ok(self.resolve_url(&raw)?.map(|url| Speech { url }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HttpSpeechClient {
        HttpSpeechClient::new(HttpSpeechConfig {
            base_url: base_url.to_string(),
            token: String::new(),
        })
        .unwrap()
    }

    #[test]
    fn test_resolve_relative_and_absolute_urls() -> Result<()> {
        let c = client("http://127.0.0.1:9880/tts");
        assert_eq!(
            c.resolve_url("audio/abc.mp3")?,
            Some("http://127.0.0.1:9880/tts/audio/abc.mp3".to_string())
        );
        assert_eq!(
            c.resolve_url("https://cdn.example.com/x.mp3")?,
            Some("https://cdn.example.com/x.mp3".to_string())
        );
        assert_eq!(c.resolve_url("   ")?, None);
        Ok(())
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = HttpSpeechClient::new(HttpSpeechConfig {
            base_url: "not a url".to_string(),
            token: String::new(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_response_without_url_field() {
        let body: SynthesisResponse = serde_json::from_str(r#"{"status": "queued"}"#).unwrap();
        assert!(body.url.is_none());
    }
}
