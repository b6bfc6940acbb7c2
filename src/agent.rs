use log::{ error, info, warn };
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::cli::Args;
use crate::history::{ self, ConversationStore, StoreError };
use crate::languages;
use crate::llm::{ self, GenerationBackend };
use crate::models::chat::{ ConversationTurn, Speaker };
use crate::prompt;
use crate::translate::{ TranslationGateway, TranslationStatus };

/// Returned when the generation backend has no credential configured.
const UNCONFIGURED_APOLOGY: &str =
    "I am sorry, my knowledge base is unavailable right now. Please try again later.";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The user-facing result of one message. `error` carries a diagnostic when
/// a fallback reply was substituted; the caller still gets a `message`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Drives the per-message pipeline: persist, normalize language, prompt,
/// generate, localize, persist. Every stage degrades on failure instead of
/// aborting the request; only invalid input rejects outright.
pub struct ChatAgent {
    backend: Option<Arc<dyn GenerationBackend>>,
    translator: Option<TranslationGateway>,
    store: Arc<dyn ConversationStore>,
    history_window: usize,
}

impl ChatAgent {
    pub fn new(args: &Args) -> Result<Self, StoreError> {
        let store = history::initialize_store(args)?;
        let backend = llm::new_backend(args);
        if backend.is_none() {
            warn!("No generation API key configured; serving fallback replies only");
        }
        Ok(Self::with_parts(backend, store, args.history_window))
    }

    pub fn with_parts(
        backend: Option<Arc<dyn GenerationBackend>>,
        store: Arc<dyn ConversationStore>,
        history_window: usize
    ) -> Self {
        let translator = backend.clone().map(TranslationGateway::new);
        Self {
            backend,
            translator,
            store,
            history_window,
        }
    }

    /// Mints a fresh opaque session identifier. Nothing is persisted until
    /// the first message arrives.
    pub fn create_session(&self) -> String {
        let session_id = Uuid::new_v4().to_string();
        info!("Created chat session {}", session_id);
        session_id
    }

    /// Every stored turn of a session, ascending by creation time.
    pub async fn history(&self, session_id: &str) -> Result<Vec<ConversationTurn>, ChatError> {
        Ok(self.store.full_history(session_id).await?)
    }

    pub async fn send_message(
        &self,
        user_id: Option<&str>,
        session_id: &str,
        message: &str,
        language: &str
    ) -> Result<ChatReply, ChatError> {
        let session_id = session_id.trim();
        let message = message.trim();
        if session_id.is_empty() {
            return Err(ChatError::InvalidInput("sessionId is required".to_string()));
        }
        if message.is_empty() {
            return Err(ChatError::InvalidInput("message is required".to_string()));
        }

        let (backend, translator) = match (&self.backend, &self.translator) {
            (Some(backend), Some(translator)) => (backend, translator),
            _ => {
                return Ok(ChatReply {
                    message: UNCONFIGURED_APOLOGY.to_string(),
                    error: Some("generation backend is not configured".to_string()),
                });
            }
        };

        let user_turn = ConversationTurn::new(session_id, user_id, Speaker::User, message, language);
        if let Err(e) = self.store.append(user_turn).await {
            warn!("History write (user) failed: {}", e);
        }

        let normalized = translator.to_working_language(message, language).await;
        if let TranslationStatus::Failed(reason) = &normalized.status {
            warn!("Using the untranslated message for prompting: {}", reason);
        }

        let recent = match self.store.recent_history(session_id, self.history_window).await {
            Ok(turns) => turns,
            Err(e) => {
                warn!("History read failed, prompting without context: {}", e);
                Vec::new()
            }
        };

        let user_prompt = prompt::build_user_turn(&recent, &normalized.text);
        let generated = match backend.generate(&user_prompt, Some(prompt::system_prompt())).await {
            Ok(text) => text,
            Err(e) => {
                error!("Generation failed: {}", e);
                let fallback = languages::fallback_apology(language);
                let bot_turn = ConversationTurn::new(
                    session_id,
                    user_id,
                    Speaker::Bot,
                    fallback,
                    language
                );
                if let Err(e) = self.store.append(bot_turn).await {
                    warn!("History write (bot) failed: {}", e);
                }
                return Ok(ChatReply {
                    message: fallback.to_string(),
                    error: Some(e.to_string()),
                });
            }
        };

        let localized = translator.translate(&generated, language).await;
        if let TranslationStatus::Failed(reason) = &localized.status {
            warn!("Returning the untranslated reply: {}", reason);
        }

        let bot_turn = ConversationTurn::new(
            session_id,
            user_id,
            Speaker::Bot,
            &localized.text,
            language
        );
        if let Err(e) = self.store.append(bot_turn).await {
            warn!("History write (bot) failed: {}", e);
        }

        Ok(ChatReply {
            message: localized.text,
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::history::memory::MemoryConversationStore;
    use crate::llm::testing::ScriptedBackend;

    fn agent_with(backend: Arc<ScriptedBackend>) -> (ChatAgent, Arc<MemoryConversationStore>) {
        let store = Arc::new(MemoryConversationStore::new());
        let agent = ChatAgent::with_parts(Some(backend), store.clone(), 10);
        (agent, store)
    }

    struct UnreachableStore;

    #[async_trait]
    impl ConversationStore for UnreachableStore {
        async fn append(&self, _turn: ConversationTurn) -> Result<ConversationTurn, StoreError> {
            Err(StoreError::Unsupported("store offline".to_string()))
        }

        async fn recent_history(
            &self,
            _session_id: &str,
            _limit: usize
        ) -> Result<Vec<ConversationTurn>, StoreError> {
            Err(StoreError::Unsupported("store offline".to_string()))
        }

        async fn full_history(
            &self,
            _session_id: &str
        ) -> Result<Vec<ConversationTurn>, StoreError> {
            Err(StoreError::Unsupported("store offline".to_string()))
        }
    }

    #[tokio::test]
    async fn rejects_missing_input_without_side_effects() {
        let backend = Arc::new(ScriptedBackend::always("reply"));
        let (agent, store) = agent_with(backend.clone());

        assert!(matches!(
            agent.send_message(None, "s1", "   ", "en").await,
            Err(ChatError::InvalidInput(_))
        ));
        assert!(matches!(
            agent.send_message(None, "", "hello there", "en").await,
            Err(ChatError::InvalidInput(_))
        ));
        assert!(store.full_history("s1").await.unwrap().is_empty());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn unconfigured_backend_short_circuits_without_persistence() {
        let store = Arc::new(MemoryConversationStore::new());
        let agent = ChatAgent::with_parts(None, store.clone(), 10);

        let reply = agent.send_message(None, "s1", "How do I grow tomatoes?", "en").await.unwrap();
        assert_eq!(reply.message, UNCONFIGURED_APOLOGY);
        assert!(reply.error.is_some());
        assert!(store.full_history("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn english_round_trip_stores_user_then_bot() {
        let backend = Arc::new(ScriptedBackend::always("Water them regularly."));
        let (agent, store) = agent_with(backend.clone());

        let reply = agent
            .send_message(Some("u1"), "s1", "How do I grow tomatoes?", "en")
            .await
            .unwrap();
        assert_eq!(reply.message, "Water them regularly.");
        assert!(reply.error.is_none());
        // English in and out: exactly one backend call, the generation.
        assert_eq!(backend.call_count(), 1);

        let turns = store.full_history("s1").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].speaker, Speaker::User);
        assert_eq!(turns[0].text, "How do I grow tomatoes?");
        assert_eq!(turns[0].user_id.as_deref(), Some("u1"));
        assert_eq!(turns[1].speaker, Speaker::Bot);
        assert_eq!(turns[1].text, "Water them regularly.");
        assert!(turns[0].created_at <= turns[1].created_at);
    }

    #[tokio::test]
    async fn hindi_message_is_translated_both_ways() {
        let backend = Arc::new(
            ScriptedBackend::new(
                vec![
                    Ok("How do I grow tomatoes?"),
                    Ok("Water them regularly."),
                    Ok("उन्हें नियमित रूप से पानी दें।")
                ]
            )
        );
        let (agent, store) = agent_with(backend.clone());

        let reply = agent
            .send_message(None, "s2", "टमाटर कैसे उगाएं?", "hi")
            .await
            .unwrap();
        assert_eq!(reply.message, "उन्हें नियमित रूप से पानी दें।");

        let calls = backend.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].contains("English"));
        assert!(calls[0].contains("टमाटर कैसे उगाएं?"));
        assert!(calls[1].contains("How do I grow tomatoes?"));
        assert!(calls[2].contains("Hindi"));
        assert!(calls[2].contains("Water them regularly."));

        let turns = store.full_history("s2").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].language, "hi");
        assert_eq!(turns[1].language, "hi");
    }

    #[tokio::test]
    async fn generation_failure_returns_the_marathi_fallback() {
        let backend = Arc::new(
            ScriptedBackend::new(vec![Ok("this question translated"), Err("backend down")])
        );
        let (agent, store) = agent_with(backend);

        let reply = agent
            .send_message(None, "s3", "कांदा साठवण कशी करावी?", "mr")
            .await
            .unwrap();
        assert_eq!(reply.message, languages::fallback_apology("mr"));
        assert!(reply.error.as_deref().unwrap().contains("backend down"));

        let turns = store.full_history("s3").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].speaker, Speaker::Bot);
        assert_eq!(turns[1].text, languages::fallback_apology("mr"));
    }

    #[tokio::test]
    async fn unlisted_language_falls_back_to_the_english_apology() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok("translated"), Err("backend down")]));
        let (agent, _store) = agent_with(backend);

        let reply = agent
            .send_message(None, "s4", "comment cultiver des tomates?", "fr")
            .await
            .unwrap();
        assert_eq!(reply.message, languages::fallback_apology("en"));
    }

    #[tokio::test]
    async fn store_failures_never_abort_the_pipeline() {
        let backend = Arc::new(ScriptedBackend::always("Water them regularly."));
        let agent = ChatAgent::with_parts(Some(backend), Arc::new(UnreachableStore), 10);

        let reply = agent
            .send_message(None, "s5", "How do I grow tomatoes?", "en")
            .await
            .unwrap();
        assert_eq!(reply.message, "Water them regularly.");
        assert!(reply.error.is_none());
    }

    #[tokio::test]
    async fn translation_failure_falls_back_to_the_untranslated_reply() {
        // Normalization fails, generation succeeds, localization fails.
        let backend = Arc::new(
            ScriptedBackend::new(
                vec![Err("translator down"), Ok("Water them regularly."), Err("translator down")]
            )
        );
        let (agent, _store) = agent_with(backend);

        let reply = agent
            .send_message(None, "s6", "टमाटर कैसे उगाएं?", "hi")
            .await
            .unwrap();
        assert_eq!(reply.message, "Water them regularly.");
        assert!(reply.error.is_none());
    }

    #[tokio::test]
    async fn session_ids_are_unique() {
        let store = Arc::new(MemoryConversationStore::new());
        let agent = ChatAgent::with_parts(None, store, 10);
        assert_ne!(agent.create_session(), agent.create_session());
    }
}
