use async_trait::async_trait;
use log::error;
use redis::{ AsyncCommands, Client };

use crate::history::{ ConversationStore, StoreError };
use crate::models::chat::ConversationTurn;

/// Stores each session as a Redis list of JSON-encoded turns, newest first.
pub struct RedisConversationStore {
    client: Client,
    key_prefix: String,
}

impl RedisConversationStore {
    pub fn new(host: &str, key_prefix: String) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::open(host)?,
            key_prefix,
        })
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }

    fn key(&self, session_id: &str) -> String {
        format!("{}{}", self.key_prefix, session_id)
    }

    fn parse_entries(&self, json_entries: &[String]) -> Vec<ConversationTurn> {
        let mut turns = Vec::with_capacity(json_entries.len());
        for json_entry in json_entries {
            match serde_json::from_str::<ConversationTurn>(json_entry) {
                Ok(turn) => turns.push(turn),
                Err(e) => {
                    error!("Error parsing history entry: {}", e);
                }
            }
        }
        // LRANGE returns newest first; callers want chronological order.
        turns.reverse();
        turns
    }
}

#[async_trait]
impl ConversationStore for RedisConversationStore {
    async fn append(&self, turn: ConversationTurn) -> Result<ConversationTurn, StoreError> {
        let mut conn = self.get_connection().await?;
        let json_turn = serde_json::to_string(&turn)?;
        let _: i64 = conn.lpush(self.key(&turn.session_id), &json_turn).await?;
        Ok(turn)
    }

    async fn recent_history(
        &self,
        session_id: &str,
        limit: usize
    ) -> Result<Vec<ConversationTurn>, StoreError> {
        let mut conn = self.get_connection().await?;
        let json_entries: Vec<String> = conn.lrange(
            self.key(session_id),
            0,
            (limit as isize) - 1
        ).await?;
        Ok(self.parse_entries(&json_entries))
    }

    async fn full_history(&self, session_id: &str) -> Result<Vec<ConversationTurn>, StoreError> {
        let mut conn = self.get_connection().await?;
        let json_entries: Vec<String> = conn.lrange(self.key(session_id), 0, -1).await?;
        Ok(self.parse_entries(&json_entries))
    }
}
