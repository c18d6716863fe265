pub mod whisper;

pub use whisper::WhisperClient;

use crate::config::Config;
use crate::error::Result;
use crate::input::MediaPayload;
use async_trait::async_trait;
use std::time::Duration;

/// A hosted speech-to-text service that answers with SRT text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Upload `media` and return the raw SRT response body.
    async fn transcribe(&self, media: &MediaPayload) -> Result<String>;
    fn name(&self) -> &'static str;
    fn max_file_size(&self) -> usize;
}

/// Build the transcriber described by `config`.
pub fn create_transcriber(config: &Config) -> Result<Box<dyn Transcriber>> {
    config.validate()?;

    let api_key = config.openai_api_key.clone().unwrap_or_default();
    let mut client = WhisperClient::new(api_key)
        .with_model(config.model.clone())
        .with_base_url(config.api_url.clone())
        .with_timeout(Duration::from_secs(config.timeout_secs));

    if let Some(ref language) = config.language {
        client = client.with_language(language.clone());
    }
    if let Some(ref prompt) = config.prompt {
        client = client.with_prompt(prompt.clone());
    }

    Ok(Box::new(client))
}
