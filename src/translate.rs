use log::warn;
use std::sync::Arc;

use crate::languages::{ self, WORKING_LANGUAGE };
use crate::llm::GenerationBackend;

/// Texts shorter than this skip translation entirely. A latency/cost
/// optimization; callers must not rely on short strings being translated.
pub const SHORT_TEXT_THRESHOLD: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationStatus {
    /// The backend produced a translation.
    Translated,
    /// Translation was skipped (working-language target or trivial input).
    Skipped,
    /// The backend failed; the original text was kept.
    Failed(String),
}

/// Outcome of a translation attempt. `text` is always usable: the gateway
/// fails open, so a failure carries the untranslated original.
#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub status: TranslationStatus,
}

impl Translation {
    fn skipped(text: &str) -> Self {
        Self {
            text: text.to_string(),
            status: TranslationStatus::Skipped,
        }
    }
}

fn is_trivial(text: &str) -> bool {
    text.chars().count() < SHORT_TEXT_THRESHOLD
}

/// Translates between the working language and the caller's language by
/// prompting the generation backend. Never aborts the caller: every failure
/// is folded into a fail-open `Translation`.
pub struct TranslationGateway {
    backend: Arc<dyn GenerationBackend>,
}

impl TranslationGateway {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    async fn request_translation(&self, text: &str, target_name: &str) -> Translation {
        let prompt = format!(
            "Translate the following text to {}. Reply with only the translated text and nothing else.\n\n{}",
            target_name,
            text
        );
        match self.backend.generate(&prompt, None).await {
            Ok(translated) => Translation {
                text: translated.trim().to_string(),
                status: TranslationStatus::Translated,
            },
            Err(e) => {
                warn!("Translation to {} failed, keeping original text: {}", target_name, e);
                Translation {
                    text: text.to_string(),
                    status: TranslationStatus::Failed(e.to_string()),
                }
            }
        }
    }

    /// Translates `text` into `target_code`. Returns the input unchanged,
    /// without a backend call, when the target is the working language or
    /// the text is trivially short.
    pub async fn translate(&self, text: &str, target_code: &str) -> Translation {
        if target_code == WORKING_LANGUAGE || is_trivial(text) {
            return Translation::skipped(text);
        }
        self.request_translation(text, languages::display_name(target_code)).await
    }

    /// Normalizes `text` from `source_code` into the working language for
    /// prompt construction. Same short-circuits as `translate`.
    pub async fn to_working_language(&self, text: &str, source_code: &str) -> Translation {
        if source_code == WORKING_LANGUAGE || is_trivial(text) {
            return Translation::skipped(text);
        }
        self.request_translation(text, languages::display_name(WORKING_LANGUAGE)).await
    }

    /// Classifies `text` into one of the supported language codes. Answers
    /// outside the supported set, and backend failures, resolve to "en".
    /// Not used by the message pipeline today.
    pub async fn detect_language(&self, text: &str) -> &'static str {
        let codes: Vec<&str> = languages::supported_codes().collect();
        let prompt = format!(
            "Identify the language of the following text. Reply with exactly one of these codes: {}.\n\n{}",
            codes.join(", "),
            text
        );
        let answer = match self.backend.generate(&prompt, None).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Language detection failed, assuming English: {}", e);
                return WORKING_LANGUAGE;
            }
        };
        let normalized = answer.trim().to_lowercase();
        languages
            ::supported_codes()
            .find(|code| *code == normalized)
            .unwrap_or(WORKING_LANGUAGE)
    }
}
