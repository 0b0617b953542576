//! Speech capability interfaces
//!
//! Synthesis and recognition are optional platform capabilities injected
//! into the engine; core logic never probes platform globals. Both are
//! best-effort enhancements: a failure never fails the turn that asked
//! for them.

use crate::assistant::lang::Language;
use crate::Result;

/// A voice the synthesis backend offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub lang_tag: String,
}

/// Text-to-speech capability. Callers cancel before speaking so utterances
/// never overlap.
pub trait SpeechSynthesizer: Send + Sync {
    fn voices(&self) -> Vec<Voice>;

    /// Interrupt whatever is currently playing.
    fn cancel(&self);

    /// Fire-and-forget playback with an optional preferred voice;
    /// `None` means the backend default.
    fn speak(&self, text: &str, voice: Option<&Voice>) -> Result<()>;
}

/// Single-utterance voice capture (non-continuous).
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Capture one utterance. `Ok(None)` means the session ended without
    /// producing a transcript.
    async fn capture_utterance(&self) -> Result<Option<String>>;
}

/// Pick the voice whose language tag best matches the detected language:
/// tag-prefix match first, then any English voice, then `None` for the
/// backend default.
pub fn select_voice(voices: &[Voice], language: Language) -> Option<Voice> {
    let tag = language.voice_tag().to_lowercase();

    if let Some(found) = voices
        .iter()
        .find(|v| v.lang_tag.to_lowercase().starts_with(&tag))
    {
        return Some(found.clone());
    }

    if tag != "en" {
        if let Some(found) = voices
            .iter()
            .find(|v| v.lang_tag.to_lowercase().starts_with("en"))
        {
            return Some(found.clone());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(name: &str, tag: &str) -> Voice {
        Voice {
            name: name.to_string(),
            lang_tag: tag.to_string(),
        }
    }

    #[test]
    fn test_exact_language_tag_preferred() {
        let voices = vec![voice("Amara", "en-US"), voice("Funmi", "yo-NG")];

        let selected = select_voice(&voices, Language::Yoruba).unwrap();
        assert_eq!(selected.name, "Funmi");
    }

    #[test]
    fn test_nigerian_english_degrades_to_any_english() {
        let voices = vec![voice("Amara", "en-US")];

        let selected = select_voice(&voices, Language::Pidgin).unwrap();
        assert_eq!(selected.name, "Amara");
    }

    #[test]
    fn test_missing_language_falls_back_to_english() {
        let voices = vec![voice("Amara", "en-GB")];

        let selected = select_voice(&voices, Language::Hausa).unwrap();
        assert_eq!(selected.name, "Amara");
    }

    #[test]
    fn test_no_match_means_backend_default() {
        let voices = vec![voice("Chidi", "ig-NG")];

        assert_eq!(select_voice(&voices, Language::Hausa), None);
    }
}
