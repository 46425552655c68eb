use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

// --- Config ---

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LlmConfig {
    pub provider: String, // "openai" or "ollama"
    #[serde(default = "default_retry_count")]
    pub retry_count: usize,
    #[serde(default)]
    pub retry_delay_seconds: u64,
    pub openai: Option<OpenAIConfig>,
    pub ollama: Option<OllamaConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
}

fn default_retry_count() -> usize {
    3
}

// --- Request / Response ---

#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    /// Prior script lines, sent ahead of the prompt. Empty when the caller
    /// does not want history included.
    pub history: Vec<String>,
    pub min_tokens: u32,
    pub max_tokens: u32,
    pub stop: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub result: String,
}

#[async_trait]
pub trait LlmClient: Send + Sync + Debug {
    /// `Ok(None)` means the service answered without a usable result.
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<Generation>>;
}

pub fn create_llm(config: &LlmConfig) -> Result<Box<dyn LlmClient>> {
    match config.provider.as_str() {
        "openai" => {
            let cfg = config.openai.as_ref().context("OpenAI config missing")?;
            Ok(Box::new(OpenAIClient::new(&cfg.api_key, &cfg.model, cfg.base_url.as_deref())))
        }
        "ollama" => {
            let cfg = config.ollama.as_ref().context("Ollama config missing")?;
            Ok(Box::new(OllamaClient::new(&cfg.base_url, &cfg.model)))
        }
        _ => Err(anyhow!("Unknown LLM provider: {}", config.provider)),
    }
}

#[derive(Serialize, Debug, PartialEq)]
struct ChatMessage {
    role: String,
    content: String,
}

fn build_messages(request: &GenerationRequest) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    if !request.system.is_empty() {
        messages.push(ChatMessage { role: "system".to_string(), content: request.system.clone() });
    }
    if !request.history.is_empty() {
        messages.push(ChatMessage {
            role: "assistant".to_string(),
            content: request.history.join("\n"),
        });
    }
    messages.push(ChatMessage { role: "user".to_string(), content: request.prompt.clone() });
    messages
}

// --- OpenAI ---

#[derive(Debug)]
struct OpenAIClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAIClient {
    fn new(api_key: &str, model: &str, base_url: Option<&str>) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.unwrap_or("https://api.openai.com/v1").trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    // Honoured by vLLM and other compatible servers, ignored by OpenAI.
    #[serde(skip_serializing_if = "is_zero")]
    min_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

#[derive(Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessageResponse,
}

#[derive(Deserialize)]
struct OpenAIMessageResponse {
    content: Option<String>,
}

impl OpenAIResponse {
    fn into_generation(self) -> Option<Generation> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|result| Generation { result })
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<Generation>> {
        let url = format!("{}/chat/completions", self.base_url);

        let request_body = OpenAIRequest {
            model: self.model.clone(),
            messages: build_messages(request),
            max_tokens: request.max_tokens,
            min_tokens: request.min_tokens,
            stop: request.stop.clone(),
        };

        let resp = self.client.post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let error_text = resp.text().await?;
            return Err(anyhow!("OpenAI API error: {}", error_text));
        }

        let result: OpenAIResponse = resp.json().await?;
        Ok(result.into_generation())
    }
}

// --- Ollama ---

#[derive(Debug)]
struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaClient {
    fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    num_predict: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: Option<OllamaMessageResponse>,
}

#[derive(Deserialize)]
struct OllamaMessageResponse {
    content: String,
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<Generation>> {
        let url = format!("{}/api/chat", self.base_url);

        let request_body = OllamaRequest {
            model: self.model.clone(),
            messages: build_messages(request),
            stream: false,
            options: OllamaOptions {
                num_predict: request.max_tokens,
                stop: request.stop.clone(),
            },
        };

        let resp = self.client.post(&url)
            .json(&request_body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let error_text = resp.text().await?;
            return Err(anyhow!("Ollama API error: {}", error_text));
        }

        let result: OllamaResponse = resp.json().await?;
        Ok(result.message.map(|m| Generation { result: m.content }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_response_parsing_success() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "JANE: \"Hello there.\""
                },
                "finish_reason": "stop"
            }]
        }"#;

        let result: OpenAIResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            result.into_generation(),
            Some(Generation { result: "JANE: \"Hello there.\"".to_string() })
        );
    }

    #[test]
    fn test_openai_response_without_content_is_none() {
        let json = r#"{ "choices": [{ "index": 0, "message": { "role": "assistant", "content": null } }] }"#;
        let result: OpenAIResponse = serde_json::from_str(json).unwrap();
        assert!(result.into_generation().is_none());

        let json = r#"{ "choices": [] }"#;
        let result: OpenAIResponse = serde_json::from_str(json).unwrap();
        assert!(result.into_generation().is_none());
    }

    #[test]
    fn test_ollama_response_parsing() {
        let json = r#"{ "model": "llama3", "message": { "role": "assistant", "content": "ok" }, "done": true }"#;
        let result: OllamaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(result.message.unwrap().content, "ok");
    }

    #[test]
    fn test_build_messages_includes_history_only_when_present() {
        let request = GenerationRequest {
            system: "You narrate.".to_string(),
            prompt: "Continue.".to_string(),
            history: vec!["JANE: Hi.".to_string(), "NARRATOR: Silence.".to_string()],
            ..Default::default()
        };
        let messages = build_messages(&request);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[1].content, "JANE: Hi.\nNARRATOR: Silence.");

        let request = GenerationRequest { prompt: "Analyze.".to_string(), ..Default::default() };
        let messages = build_messages(&request);
        assert_eq!(messages, vec![ChatMessage { role: "user".to_string(), content: "Analyze.".to_string() }]);
    }

    #[test]
    fn test_create_llm_requires_provider_config() {
        let config = LlmConfig {
            provider: "openai".to_string(),
            retry_count: 3,
            retry_delay_seconds: 0,
            openai: None,
            ollama: None,
        };
        assert!(create_llm(&config).is_err());

        let config = LlmConfig { provider: "mystery".to_string(), ..config };
        assert!(create_llm(&config).is_err());
    }
}
