//! Generation client: key rotation plus retry around a single image call.

use async_trait::async_trait;
use promptsheet_core::ports::ImageGenerator;
use promptsheet_core::CoreError;

use crate::api::{ImageBackend, OpenAiImagesApi, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::keys::KeyRing;
use crate::retry::{next_delay, RetryConfig};

/// Configuration for [`GenerationClient::new`].
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// API keys used in rotation. Must contain at least one non-blank key.
    pub api_keys: Vec<String>,
    pub base_url: String,
    pub model: String,
    pub retry: RetryConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            retry: RetryConfig::default(),
        }
    }
}

/// Image generator that rotates API keys and retries failed calls.
///
/// Every attempt (including retries) takes the next key from the ring.
/// After [`RetryConfig::max_attempts`] failures the last error is returned
/// as [`CoreError::Generation`].
pub struct GenerationClient<B = OpenAiImagesApi> {
    backend: B,
    keys: KeyRing,
    retry: RetryConfig,
}

impl GenerationClient<OpenAiImagesApi> {
    /// Build a client against the OpenAI API. Fails fast when no key is
    /// configured.
    pub fn new(config: GenerationConfig) -> Result<Self, CoreError> {
        let backend = OpenAiImagesApi::new(config.base_url, config.model);
        Self::with_backend(backend, config.api_keys, config.retry)
    }
}

impl<B: ImageBackend> GenerationClient<B> {
    /// Build a client around an arbitrary backend.
    pub fn with_backend(
        backend: B,
        api_keys: Vec<String>,
        retry: RetryConfig,
    ) -> Result<Self, CoreError> {
        let keys = KeyRing::new(api_keys)?;
        tracing::info!(keys = keys.len(), max_attempts = retry.max_attempts, "Generation client ready");
        Ok(Self {
            backend,
            keys,
            retry,
        })
    }
}

#[async_trait]
impl<B: ImageBackend> ImageGenerator for GenerationClient<B> {
    async fn generate(&self, prompt: &str, size: &str) -> Result<Vec<u8>, CoreError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut delay = self.retry.initial_delay;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let (call_index, key) = self.keys.next_key().await;
            let key_slot = call_index % self.keys.len() as u64;

            match self.backend.generate_image(key, prompt, size).await {
                Ok(bytes) => {
                    tracing::debug!(attempt, key_slot, bytes = bytes.len(), "Image generated");
                    return Ok(bytes);
                }
                Err(e) if attempt >= max_attempts => {
                    tracing::error!(attempt, key_slot, error = %e, "Image generation failed after all retries");
                    return Err(CoreError::Generation(e.to_string()));
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        key_slot,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Image generation attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = next_delay(delay, &self.retry);
                }
            }
        }
    }
}
