use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::services::llm::LlmConfig;
use crate::services::tts::SpeechConfig;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_world_file")]
    pub world_file: String,

    #[serde(default)]
    pub unattended: bool,

    pub llm: LlmConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    pub skit: SkitConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SkitConfig {
    pub location: String,
    #[serde(default = "default_min_tokens")]
    pub min_tokens: u32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_outcome_max_tokens")]
    pub outcome_max_tokens: u32,
}

impl Default for SkitConfig {
    fn default() -> Self {
        Self {
            location: String::new(),
            min_tokens: default_min_tokens(),
            max_tokens: default_max_tokens(),
            outcome_max_tokens: default_outcome_max_tokens(),
        }
    }
}

fn default_world_file() -> String {
    "world.yml".to_string()
}
fn default_min_tokens() -> u32 {
    50
}
fn default_max_tokens() -> u32 {
    400
}
fn default_outcome_max_tokens() -> u32 {
    200
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from("config.yml")
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("{:?} not found. Please create one.", path);
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config =
            serde_yaml_ng::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_applies_defaults() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("config.yml");
        fs::write(
            &path,
            "llm:\n  provider: ollama\n  ollama:\n    base_url: http://localhost:11434\n    model: llama3\nskit:\n  location: bridge\n",
        )?;

        let config = Config::load_from(&path)?;
        assert_eq!(config.world_file, "world.yml");
        assert!(!config.unattended);
        assert_eq!(config.llm.retry_count, 3);
        assert_eq!(config.llm.retry_delay_seconds, 0);
        assert_eq!(config.speech.provider, "none");
        assert_eq!(config.skit.location, "bridge");
        assert_eq!(config.skit.max_tokens, 400);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Config::load_from("definitely/not/here.yml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_openai_provider() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("config.yml");
        fs::write(
            &path,
            "llm:\n  provider: openai\n  openai:\n    api_key: k\n    model: m\nskit:\n  location: galley\n  max_tokens: 300\n",
        )?;

        let config = Config::load_from(&path)?;
        assert_eq!(config.llm.provider, "openai");
        assert!(config.llm.ollama.is_none());
        assert_eq!(config.skit.location, "galley");
        assert_eq!(config.skit.max_tokens, 300);
        assert_eq!(config.skit.min_tokens, 50);
        assert_eq!(config.llm.openai.map(|o| o.model), Some("m".to_string()));
        Ok(())
    }
}
