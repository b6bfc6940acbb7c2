use crate::models::chat::ConversationTurn;

/// Most recent turns replayed into the prompt. A cost/context trade-off,
/// not a correctness bound.
pub const PROMPT_HISTORY_WINDOW: usize = 10;

const SYSTEM_PROMPT: &str =
    "You are Krishi Mitra, the agricultural assistant of the Krishi-Connect \
farm-to-consumer marketplace. You help farmers and buyers with crops, soil, \
irrigation, pests, fertilizers, harvest timing, cold storage, and market \
prices. Keep answers practical and concise. If a question is unrelated to \
farming, politely steer the conversation back to agriculture instead of \
refusing outright.";

/// Fixed persona sent as the system instruction on every generation call.
pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Builds the user-turn prompt: a labeled transcript of the most recent
/// turns (oldest first) followed by the latest message, or just the latest
/// message when there is no history.
pub fn build_user_turn(history: &[ConversationTurn], latest_message: &str) -> String {
    if history.is_empty() {
        return latest_message.to_string();
    }

    let start = history.len().saturating_sub(PROMPT_HISTORY_WINDOW);
    let mut result = String::from("Previous conversation:\n");
    for turn in &history[start..] {
        result.push_str(&format!("{}: {}\n", turn.speaker.label(), turn.text));
    }
    result.push_str(&format!("\nUser's latest message: {}", latest_message));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Speaker;

    fn turn(speaker: Speaker, text: &str) -> ConversationTurn {
        ConversationTurn::new("s1", None, speaker, text, "en")
    }

    #[test]
    fn empty_history_yields_bare_message() {
        assert_eq!(build_user_turn(&[], "How do I grow tomatoes?"), "How do I grow tomatoes?");
    }

    #[test]
    fn transcript_is_labeled_and_oldest_first() {
        let history = vec![
            turn(Speaker::User, "What fertilizer for wheat?"),
            turn(Speaker::Bot, "Use a balanced NPK mix.")
        ];
        let prompt = build_user_turn(&history, "How often?");
        assert!(prompt.starts_with("Previous conversation:\n"));
        let user_pos = prompt.find("User: What fertilizer for wheat?").unwrap();
        let bot_pos = prompt.find("Assistant: Use a balanced NPK mix.").unwrap();
        assert!(user_pos < bot_pos);
        assert!(prompt.ends_with("User's latest message: How often?"));
    }

    #[test]
    fn transcript_is_capped_to_the_window() {
        let history: Vec<ConversationTurn> = (0..15)
            .map(|i| turn(Speaker::User, &format!("question {}", i)))
            .collect();
        let prompt = build_user_turn(&history, "latest");
        assert!(!prompt.contains("question 4"));
        assert!(prompt.contains("question 5"));
        assert!(prompt.contains("question 14"));
    }

    #[test]
    fn persona_mentions_the_domain() {
        assert!(system_prompt().contains("agricultural"));
    }
}
