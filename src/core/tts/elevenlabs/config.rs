//! ElevenLabs configuration types: model selection, voice settings and
//! the mapping from the gateway's audio format to ElevenLabs'
//! `output_format` strings.

use serde::{Deserialize, Serialize};

use crate::core::tts::AudioFormat;

/// ElevenLabs synthesis model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ElevenLabsModel {
    /// Highest cloning fidelity, 29 languages - default
    #[default]
    ElevenMultilingualV2,
    /// Lower latency, slightly reduced fidelity
    ElevenTurboV25,
    /// Lowest latency flash model
    ElevenFlashV25,
}

impl ElevenLabsModel {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ElevenMultilingualV2 => "eleven_multilingual_v2",
            Self::ElevenTurboV25 => "eleven_turbo_v2_5",
            Self::ElevenFlashV25 => "eleven_flash_v2_5",
        }
    }

    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "eleven_turbo_v2_5" | "turbo" => Self::ElevenTurboV25,
            "eleven_flash_v2_5" | "flash" => Self::ElevenFlashV25,
            _ => Self::ElevenMultilingualV2,
        }
    }
}

/// Voice rendering knobs forwarded to ElevenLabs per request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// 0.0..=1.0, lower values drift more between renders
    pub stability: f32,
    /// 0.0..=1.0, how tightly the render tracks the cloned reference
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}

/// ElevenLabs `output_format` query value for a gateway format/rate pair.
///
/// ElevenLabs has no WAV container output; WAV requests are rendered as
/// PCM at the requested rate and the gateway keeps the caller's declared
/// format tag.
pub(super) fn output_format_param(format: AudioFormat, sample_rate: u32) -> String {
    match format {
        AudioFormat::Mp3 => format!("mp3_{sample_rate}_128"),
        AudioFormat::Wav | AudioFormat::Pcm16 => format!("pcm_{sample_rate}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_strings() {
        assert_eq!(
            ElevenLabsModel::default().as_str(),
            "eleven_multilingual_v2"
        );
        assert_eq!(
            ElevenLabsModel::from_str_or_default("turbo"),
            ElevenLabsModel::ElevenTurboV25
        );
        assert_eq!(
            ElevenLabsModel::from_str_or_default("garbage"),
            ElevenLabsModel::ElevenMultilingualV2
        );
    }

    #[test]
    fn test_output_format_param() {
        assert_eq!(output_format_param(AudioFormat::Mp3, 44100), "mp3_44100_128");
        assert_eq!(output_format_param(AudioFormat::Wav, 24000), "pcm_24000");
        assert_eq!(output_format_param(AudioFormat::Pcm16, 16000), "pcm_16000");
    }

    #[test]
    fn test_voice_settings_defaults() {
        let settings = VoiceSettings::default();
        assert!((settings.stability - 0.5).abs() < f32::EPSILON);
        assert!((settings.similarity_boost - 0.75).abs() < f32::EPSILON);
    }
}
