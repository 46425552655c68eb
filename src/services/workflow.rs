use crate::core::config::SkitConfig;
use crate::core::state::{ScriptEntry, Skit, SkitResult, World};
use crate::services::llm::{GenerationRequest, LlmClient};
use crate::services::outcome::{parse_outcome, Outcome};
use crate::services::prompt::{PromptBuilder, NO_CHANGES_TOKEN};
use crate::services::request::RequestParser;
use crate::services::script::{build_entries, combine_lines, render_script};
use crate::services::speech::dispatch_speech;
use crate::services::tts::SpeechClient;
use anyhow::{anyhow, Result};
use log::{info, warn};
use std::time::Duration;

pub struct SkitWorkflow {
    config: SkitConfig,
    retry_count: usize,
    retry_delay: Duration,
    llm: Box<dyn LlmClient>,
    tts: Box<dyn SpeechClient>,
    prompts: Box<dyn PromptBuilder>,
    request_parser: Box<dyn RequestParser>,
}

impl SkitWorkflow {
    pub fn new(
        config: SkitConfig,
        llm: Box<dyn LlmClient>,
        tts: Box<dyn SpeechClient>,
        prompts: Box<dyn PromptBuilder>,
        request_parser: Box<dyn RequestParser>,
    ) -> Self {
        Self {
            config,
            retry_count: 3,
            retry_delay: Duration::ZERO,
            llm,
            tts,
            prompts,
            request_parser,
        }
    }

    pub fn with_retry(mut self, retry_count: usize, retry_delay_seconds: u64) -> Self {
        self.retry_count = retry_count;
        self.retry_delay = Duration::from_secs(retry_delay_seconds);
        self
    }

    /// Runs one generation cycle for `skit`.
    ///
    /// On success the new entries are appended to `skit.script` and the
    /// outcome fields are overwritten. When every attempt fails the empty
    /// sentinel is returned and `skit` is left untouched.
    pub async fn generate(&self, skit: &mut Skit, world: &World) -> SkitResult {
        for attempt in 1..=self.retry_count {
            match self.request_script(skit, world).await {
                Ok(raw) => {
                    let result = self.process(&raw, skit, world).await;
                    skit.script.extend(result.entries.iter().cloned());
                    skit.ended = result.end_scene;
                    skit.stat_changes = result.stat_changes.clone();
                    skit.requests = result.requests.clone();
                    return result;
                }
                Err(e) => {
                    warn!("Generation attempt {}/{} failed: {}", attempt, self.retry_count, e);
                    if attempt < self.retry_count && !self.retry_delay.is_zero() {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        warn!("Generation gave up after {} attempts", self.retry_count);
        SkitResult::empty()
    }

    async fn request_script(&self, skit: &Skit, world: &World) -> Result<String> {
        let prompt = self.prompts.skit_prompt(skit, world);
        let request = GenerationRequest {
            system: prompt.system,
            prompt: prompt.user,
            history: render_script(&skit.script),
            min_tokens: self.config.min_tokens,
            max_tokens: self.config.max_tokens,
            stop: Vec::new(),
        };

        let generation = self
            .llm
            .generate(&request)
            .await?
            .ok_or_else(|| anyhow!("no result returned"))?;
        if generation.result.trim().is_empty() {
            return Err(anyhow!("blank result"));
        }
        Ok(generation.result)
    }

    async fn process(&self, raw: &str, skit: &Skit, world: &World) -> SkitResult {
        let present = world.present_actors(&skit.location);
        let combined = combine_lines(raw, &present);
        let end_scene = combined.end_scene;
        let mut entries = build_entries(combined.lines, &present);
        info!("Parsed {} entries (end of scene: {})", entries.len(), end_scene);

        // Speech fills URLs in place; the analysis prompt only needs the text.
        let transcript = if end_scene { entries.clone() } else { Vec::new() };
        let (_, outcome) = futures_util::join!(
            dispatch_speech(&mut entries, &world.actors, self.tts.as_ref()),
            async {
                if end_scene {
                    self.analyze_outcome(skit, &transcript, world).await
                } else {
                    Outcome::default()
                }
            }
        );

        if end_scene {
            if let Some(last) = entries.last_mut() {
                last.end_scene = Some(true);
            }
        }

        SkitResult {
            entries,
            end_scene,
            stat_changes: outcome.stat_changes,
            requests: outcome.requests,
        }
    }

    async fn analyze_outcome(&self, skit: &Skit, new_entries: &[ScriptEntry], world: &World) -> Outcome {
        let mut concluded = skit.clone();
        concluded.script.extend_from_slice(new_entries);

        let prompt = self.prompts.outcome_prompt(&concluded, world);
        let request = GenerationRequest {
            system: prompt.system,
            prompt: prompt.user,
            history: Vec::new(),
            min_tokens: 0,
            max_tokens: self.config.outcome_max_tokens,
            stop: vec![NO_CHANGES_TOKEN.to_string()],
        };

        match self.llm.generate(&request).await {
            Ok(Some(generation)) => parse_outcome(
                &generation.result,
                &skit.location,
                world,
                self.request_parser.as_ref(),
            ),
            Ok(None) => Outcome::default(),
            Err(e) => {
                warn!("Outcome analysis failed: {}", e);
                Outcome::default()
            }
        }
    }
}
