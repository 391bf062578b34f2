use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::api_connection::connection::ApiConnectionError;
use crate::api_connection::endpoints::{ChatCompletionRequest, ChatMessage, Provider};
use crate::config::ChefConfig;

/// A text-generation backend. Implementations swallow transport, auth and
/// rate-limit failures and report them as `None`.
#[async_trait]
pub trait GenerationService: Send + Sync {
    fn is_available(&self) -> bool;

    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Option<String>;

    /// Sends a tiny fixed exchange and reports whether any text came back.
    async fn check_connection(&self) -> bool {
        if !self.is_available() {
            return false;
        }
        self.generate("Тестовое сообщение", "Ты - помощник. Ответь коротко 'Тест пройден'", 0.0, 20)
            .await
            .is_some()
    }
}

/// Chat-completions backed generator with its own per-call timeout.
pub struct ChatCompletionGenerator {
    provider: Provider,
    model: String,
    timeout: Duration,
}

impl ChatCompletionGenerator {
    pub fn new(provider: Provider, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            provider,
            model: model.into(),
            timeout,
        }
    }

    pub fn from_config(config: &ChefConfig) -> Self {
        Self::new(
            Provider::with_url(&config.api_key_env_var, &config.api_url),
            config.model.clone(),
            config.timeout,
        )
    }

    pub async fn try_generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, ApiConnectionError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system_instruction), ChatMessage::user(prompt)],
            temperature: Some(temperature),
            max_tokens: Some(max_tokens),
        };

        let response = tokio::time::timeout(self.timeout, self.provider.call_chat_completion(request))
            .await
            .map_err(|_| ApiConnectionError::Timeout(self.timeout))??;

        response
            .first_text()
            .map(str::to_string)
            .ok_or(ApiConnectionError::EmptyResponse)
    }
}

#[async_trait]
impl GenerationService for ChatCompletionGenerator {
    fn is_available(&self) -> bool {
        self.provider.has_api_key()
    }

    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Option<String> {
        let started = Instant::now();
        match self.try_generate(prompt, system_instruction, temperature, max_tokens).await {
            Ok(text) => {
                info!(
                    model = %self.model,
                    chars = text.chars().count(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "generation succeeded"
                );
                Some(text)
            }
            Err(e) => {
                warn!(model = %self.model, error = %e, "generation failed");
                None
            }
        }
    }
}

/// Stand-in used when no generation backend is configured.
pub struct UnavailableGenerator;

#[async_trait]
impl GenerationService for UnavailableGenerator {
    fn is_available(&self) -> bool {
        false
    }

    async fn generate(&self, _: &str, _: &str, _: f32, _: u32) -> Option<String> {
        debug!("generation requested but no backend is configured");
        None
    }
}
