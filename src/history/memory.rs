use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::history::{ ConversationStore, StoreError };
use crate::models::chat::ConversationTurn;

/// Process-local store. The default backend, and what the tests run against.
pub struct MemoryConversationStore {
    sessions: RwLock<HashMap<String, Vec<ConversationTurn>>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn append(&self, turn: ConversationTurn) -> Result<ConversationTurn, StoreError> {
        let mut sessions = self.sessions.write().await;
        sessions.entry(turn.session_id.clone()).or_default().push(turn.clone());
        Ok(turn)
    }

    async fn recent_history(
        &self,
        session_id: &str,
        limit: usize
    ) -> Result<Vec<ConversationTurn>, StoreError> {
        let sessions = self.sessions.read().await;
        let turns = sessions.get(session_id).map(|t| t.as_slice()).unwrap_or_default();
        let start = turns.len().saturating_sub(limit);
        Ok(turns[start..].to_vec())
    }

    async fn full_history(&self, session_id: &str) -> Result<Vec<ConversationTurn>, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Speaker;

    fn turn(session: &str, text: &str, created_at: i64) -> ConversationTurn {
        let mut t = ConversationTurn::new(session, None, Speaker::User, text, "en");
        t.created_at = created_at;
        t
    }

    #[tokio::test]
    async fn recent_history_is_capped_and_chronological() {
        let store = MemoryConversationStore::new();
        for i in 0..15 {
            store
                .append(turn("s1", &format!("message {}", i), i))
                .await
                .unwrap();
        }

        let recent = store.recent_history("s1", 10).await.unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent.first().unwrap().text, "message 5");
        assert_eq!(recent.last().unwrap().text, "message 14");
        assert!(recent.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        assert!(recent.iter().all(|t| t.session_id == "s1"));
    }

    #[tokio::test]
    async fn histories_are_scoped_by_session() {
        let store = MemoryConversationStore::new();
        store.append(turn("s1", "for s1", 1)).await.unwrap();
        store.append(turn("s2", "for s2", 2)).await.unwrap();

        let s1 = store.full_history("s1").await.unwrap();
        assert_eq!(s1.len(), 1);
        assert_eq!(s1[0].text, "for s1");

        assert!(store.full_history("unknown").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn full_history_is_unbounded() {
        let store = MemoryConversationStore::new();
        for i in 0..25 {
            store.append(turn("s1", &format!("m{}", i), i)).await.unwrap();
        }
        assert_eq!(store.full_history("s1").await.unwrap().len(), 25);
    }
}
