use serde::{ Serialize, Deserialize };

/// Author of a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Bot => "Assistant",
        }
    }
}

/// One message within a session's conversation. Turns are append-only;
/// `created_at` (epoch milliseconds) is the sole ordering key.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub speaker: Speaker,
    pub text: String,
    pub language: String,
    pub created_at: i64,
}

impl ConversationTurn {
    pub fn new(
        session_id: &str,
        user_id: Option<&str>,
        speaker: Speaker,
        text: &str,
        language: &str
    ) -> Self {
        Self {
            session_id: session_id.to_string(),
            user_id: user_id.map(|u| u.to_string()),
            speaker,
            text: text.to_string(),
            language: language.to_string(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
