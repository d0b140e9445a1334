use serde::{Deserialize, Serialize};
use std::fmt;

/// Modes the catalog knows how to group.
///
/// The feed's mode field is open-ended; anything not listed here is still
/// displayed, but falls into [`ModeFamily::Other`] for comparison purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownMode {
    Chat,
    Responses,
    Completion,
    Embedding,
    Rerank,
    ImageGeneration,
    VideoGeneration,
    Ocr,
    AudioTranscription,
    AudioGeneration,
    AudioSpeech,
    Voice,
}

impl KnownMode {
    /// Exact, case-sensitive match against the feed's spelling.
    pub fn parse(mode: &str) -> Option<Self> {
        let known = match mode {
            "chat" => KnownMode::Chat,
            "responses" => KnownMode::Responses,
            "completion" => KnownMode::Completion,
            "embedding" => KnownMode::Embedding,
            "rerank" => KnownMode::Rerank,
            "image_generation" => KnownMode::ImageGeneration,
            "video_generation" => KnownMode::VideoGeneration,
            "ocr" => KnownMode::Ocr,
            "audio_transcription" => KnownMode::AudioTranscription,
            "audio_generation" => KnownMode::AudioGeneration,
            "audio_speech" => KnownMode::AudioSpeech,
            "voice" => KnownMode::Voice,
            _ => return None,
        };
        Some(known)
    }

    pub fn family(self) -> ModeFamily {
        match self {
            KnownMode::Chat | KnownMode::Responses | KnownMode::Completion => ModeFamily::Text,
            KnownMode::Embedding => ModeFamily::Embedding,
            KnownMode::Rerank => ModeFamily::Rerank,
            KnownMode::ImageGeneration => ModeFamily::Image,
            KnownMode::VideoGeneration => ModeFamily::Video,
            KnownMode::Ocr => ModeFamily::Ocr,
            KnownMode::AudioTranscription => ModeFamily::AudioTranscription,
            KnownMode::AudioGeneration | KnownMode::AudioSpeech | KnownMode::Voice => {
                ModeFamily::AudioGeneration
            }
        }
    }
}

/// Coarse grouping of modes. Only models in the same family are offered as
/// comparison counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeFamily {
    Text,
    Embedding,
    Rerank,
    Image,
    Video,
    Ocr,
    AudioTranscription,
    AudioGeneration,
    Other,
}

impl ModeFamily {
    pub fn of(mode: &str) -> Self {
        KnownMode::parse(mode)
            .map(KnownMode::family)
            .unwrap_or(ModeFamily::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModeFamily::Text => "text",
            ModeFamily::Embedding => "embedding",
            ModeFamily::Rerank => "rerank",
            ModeFamily::Image => "image",
            ModeFamily::Video => "video",
            ModeFamily::Ocr => "ocr",
            ModeFamily::AudioTranscription => "audio_transcription",
            ModeFamily::AudioGeneration => "audio_generation",
            ModeFamily::Other => "other",
        }
    }
}

impl fmt::Display for ModeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
