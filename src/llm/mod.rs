pub mod gemini;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::cli::Args;
use self::gemini::GeminiClient;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation backend returned status {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },
    #[error("generation backend returned no usable candidate")]
    EmptyResponse,
}

/// The external service that turns a prompt into natural-language text.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: Option<&str>
    ) -> Result<String, GenerationError>;
}


/// Builds the configured backend, or `None` when no credential is present.
/// An uncredentialed service still answers requests, substituting a fixed
/// apology for every message instead of attempting generation.
pub fn new_backend(args: &Args) -> Option<Arc<dyn GenerationBackend>> {
    if args.chat_api_key.trim().is_empty() {
        return None;
    }
    let client = GeminiClient::new(
        args.chat_api_key.clone(),
        args.chat_model.clone(),
        args.chat_base_url.clone(),
        args.chat_temperature,
        args.chat_max_tokens,
        args.request_timeout_secs
    );
    Some(Arc::new(client))
}
