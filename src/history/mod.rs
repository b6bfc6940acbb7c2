pub mod memory;
mod redis;

use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use thiserror::Error;

use crate::cli::Args;
use crate::models::chat::ConversationTurn;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
    #[error("turn encoding error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("unsupported conversation store type: {0}")]
    Unsupported(String),
}

/// Append-only persistence of conversation turns, keyed by session.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persists one turn and returns it as stored. Turns are never updated
    /// or deleted afterwards.
    async fn append(&self, turn: ConversationTurn) -> Result<ConversationTurn, StoreError>;

    /// The most recent turns of a session, ascending by creation time,
    /// capped at `limit`.
    async fn recent_history(
        &self,
        session_id: &str,
        limit: usize
    ) -> Result<Vec<ConversationTurn>, StoreError>;

    /// Every turn of a session, ascending by creation time. Serves the
    /// read-only history endpoint; the message pipeline never needs it.
    async fn full_history(&self, session_id: &str) -> Result<Vec<ConversationTurn>, StoreError>;
}

pub fn create_store(args: &Args) -> Result<Arc<dyn ConversationStore>, StoreError> {
    match args.history_type.to_lowercase().as_str() {
        "memory" => Ok(Arc::new(memory::MemoryConversationStore::new())),
        "redis" => {
            let store = redis::RedisConversationStore::new(
                &args.history_host,
                args.history_redis_prefix.clone()
            )?;
            Ok(Arc::new(store))
        }
        other => Err(StoreError::Unsupported(other.to_string())),
    }
}

pub fn initialize_store(args: &Args) -> Result<Arc<dyn ConversationStore>, StoreError> {
    info!("Conversation history will be stored in: {}", args.history_type);
    create_store(args)
}
