//! Fish Audio configuration types.

use serde::{Deserialize, Serialize};

use crate::core::tts::AudioFormat;

/// Fish Audio synthesis model, sent as the `model` request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FishAudioModel {
    /// Current production cloning model - default
    #[default]
    Speech15,
    /// Older, cheaper model
    Speech1,
}

impl FishAudioModel {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Speech15 => "speech-1.5",
            Self::Speech1 => "speech-1",
        }
    }
}

/// Fish Audio `format` body value for a gateway format.
pub(super) fn format_param(format: AudioFormat) -> &'static str {
    match format {
        AudioFormat::Wav => "wav",
        AudioFormat::Mp3 => "mp3",
        AudioFormat::Pcm16 => "pcm",
    }
}
