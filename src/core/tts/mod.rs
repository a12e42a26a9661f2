//! TTS synthesis clients.
//!
//! One thin HTTP client per engine, all implementing [`SynthesisProvider`].
//! The fallback orchestrator depends only on the trait; concrete provider
//! types are reached exclusively through [`create_provider`] and the
//! [`ProviderRegistry`].

pub mod elevenlabs;
pub mod f5;
pub mod fish_audio;
pub mod openvoice;
pub mod supertonic;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::errors::voice_error::{VoiceError, VoiceResult};

pub use elevenlabs::{ELEVENLABS_BASE_URL, ElevenLabsTts};
pub use f5::F5Tts;
pub use fish_audio::{FISH_AUDIO_BASE_URL, FishAudioTts};
pub use openvoice::OpenVoiceTts;
pub use supertonic::SupertonicTts;

/// Canonical engine names. Provider aliases are folded into these by
/// [`canonical_engine_name`].
pub const ENGINE_ELEVENLABS: &str = "elevenlabs";
pub const ENGINE_FISH_AUDIO: &str = "fish_audio";
pub const ENGINE_F5: &str = "f5";
pub const ENGINE_SUPERTONIC: &str = "supertonic";
pub const ENGINE_OPENVOICE: &str = "openvoice";

/// All engines the gateway knows how to construct, in no particular order.
pub const ALL_ENGINES: &[&str] = &[
    ENGINE_ELEVENLABS,
    ENGINE_FISH_AUDIO,
    ENGINE_F5,
    ENGINE_SUPERTONIC,
    ENGINE_OPENVOICE,
];

/// Audio container/encoding tag threaded untouched from the request
/// through the cache to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    /// WAV container - default
    #[default]
    Wav,
    /// MP3 format
    Mp3,
    /// 16-bit signed little-endian PCM, no container
    Pcm16,
}

impl AudioFormat {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Pcm16 => "pcm_s16le",
        }
    }

    /// MIME content type reported to callers for this format.
    #[inline]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::Pcm16 => "audio/pcm",
        }
    }

    /// Default sample rate used when the caller does not pin one.
    #[inline]
    pub const fn default_sample_rate(&self) -> u32 {
        match self {
            Self::Wav | Self::Pcm16 => 24000,
            Self::Mp3 => 44100,
        }
    }

    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "mp3" => Self::Mp3,
            "pcm" | "pcm_s16le" | "linear16" => Self::Pcm16,
            _ => Self::Wav,
        }
    }
}

/// Provider-agnostic synthesis parameters.
///
/// `voice_id` is the provider-specific identifier produced by the voice
/// mapping table, never a raw seed name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisParams {
    pub voice_id: String,
    pub audio_format: AudioFormat,
    pub sample_rate: u32,
    /// Speaking speed multiplier, provider-clamped
    pub speed: Option<f32>,
}

impl SynthesisParams {
    pub fn new(voice_id: impl Into<String>) -> Self {
        let audio_format = AudioFormat::default();
        Self {
            voice_id: voice_id.into(),
            audio_format,
            sample_rate: audio_format.default_sample_rate(),
            speed: None,
        }
    }
}

/// The result of a single successful provider call.
///
/// Format metadata mirrors the request params; providers must not guess.
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub audio: Bytes,
    pub content_type: String,
    pub format: AudioFormat,
    pub sample_rate: u32,
}

/// Outcome of a provider reachability probe. Probes never error; failures
/// are captured as `healthy: false` with the cause in `detail`.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderHealth {
    pub engine: String,
    pub healthy: bool,
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Uniform contract implemented by every TTS backend.
#[async_trait]
pub trait SynthesisProvider: Send + Sync {
    /// Canonical engine name this provider is registered under
    fn name(&self) -> &'static str;

    /// Perform the network call and return audio bytes plus format
    /// metadata. Non-2xx or malformed responses surface as
    /// [`VoiceError::SynthesisFailed`] carrying the provider's diagnostic
    /// message so fallback logic can see why an engine failed.
    async fn synthesize(&self, text: &str, params: &SynthesisParams)
    -> VoiceResult<SynthesizedAudio>;

    /// Lightweight reachability probe.
    async fn check_health(&self) -> ProviderHealth;
}

/// Fold provider name aliases into the canonical engine name.
pub fn canonical_engine_name(engine: &str) -> Option<&'static str> {
    match engine.to_lowercase().as_str() {
        "elevenlabs" | "eleven-labs" | "eleven_labs" => Some(ENGINE_ELEVENLABS),
        "fish_audio" | "fish-audio" | "fish" | "fish.audio" => Some(ENGINE_FISH_AUDIO),
        "f5" | "f5-tts" | "f5_tts" | "runpod-f5" => Some(ENGINE_F5),
        "supertonic" => Some(ENGINE_SUPERTONIC),
        "openvoice" | "open-voice" | "open_voice" => Some(ENGINE_OPENVOICE),
        _ => None,
    }
}

/// Factory function to create a synthesis provider.
///
/// # Supported engines
///
/// - `"elevenlabs"` - ElevenLabs voice cloning API
/// - `"fish_audio"` - Fish Audio TTS API
/// - `"f5"` - F5-TTS on a RunPod serverless endpoint
/// - `"supertonic"` - local Supertonic server
/// - `"openvoice"` - local OpenVoice server
///
/// Missing credentials/endpoints surface as
/// [`VoiceError::ProviderUnconfigured`], unknown names as
/// [`VoiceError::InvalidRequest`].
pub fn create_provider(
    engine: &str,
    config: &ServerConfig,
) -> VoiceResult<Arc<dyn SynthesisProvider>> {
    match canonical_engine_name(engine) {
        Some(ENGINE_ELEVENLABS) => Ok(Arc::new(ElevenLabsTts::new(config)?)),
        Some(ENGINE_FISH_AUDIO) => Ok(Arc::new(FishAudioTts::new(config)?)),
        Some(ENGINE_F5) => Ok(Arc::new(F5Tts::new(config)?)),
        Some(ENGINE_SUPERTONIC) => Ok(Arc::new(SupertonicTts::new(config)?)),
        Some(ENGINE_OPENVOICE) => Ok(Arc::new(OpenVoiceTts::new(config)?)),
        _ => Err(VoiceError::InvalidRequest(format!(
            "Unsupported engine: {engine}. Supported engines: {}",
            ALL_ENGINES.join(", ")
        ))),
    }
}

/// Registry of constructed providers keyed by canonical engine name.
///
/// Built once at startup from [`ServerConfig`]; engines without
/// credentials are simply not registered, which is how the router learns
/// what it may route to.
pub struct ProviderRegistry {
    providers: HashMap<&'static str, Arc<dyn SynthesisProvider>>,
}

impl ProviderRegistry {
    /// Construct every engine the config has credentials/endpoints for.
    pub fn from_config(config: &ServerConfig) -> Self {
        let mut providers: HashMap<&'static str, Arc<dyn SynthesisProvider>> = HashMap::new();
        for engine in ALL_ENGINES {
            if !config.is_engine_configured(engine) {
                continue;
            }
            match create_provider(engine, config) {
                Ok(provider) => {
                    providers.insert(provider.name(), provider);
                }
                Err(e) => {
                    tracing::warn!(engine, error = %e, "Skipping provider that failed to construct");
                }
            }
        }
        tracing::info!(
            engines = ?providers.keys().collect::<Vec<_>>(),
            "Provider registry initialized"
        );
        Self { providers }
    }

    /// Empty registry, useful for tests.
    pub fn empty() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    pub fn get(&self, engine: &str) -> Option<Arc<dyn SynthesisProvider>> {
        canonical_engine_name(engine).and_then(|name| self.providers.get(name).cloned())
    }

    pub fn contains(&self, engine: &str) -> bool {
        canonical_engine_name(engine)
            .map(|name| self.providers.contains_key(name))
            .unwrap_or(false)
    }

    /// Canonical names of every registered engine.
    pub fn engines(&self) -> Vec<&'static str> {
        self.providers.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Probe every registered provider. Probes run concurrently; a probe
    /// never errors, it reports unhealthy instead.
    pub async fn health_report(&self) -> Vec<ProviderHealth> {
        let probes = self.providers.values().map(|p| p.check_health());
        let mut report = futures::future::join_all(probes).await;
        report.sort_by(|a, b| a.engine.cmp(&b.engine));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured_config() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.elevenlabs_api_key = Some("xi-test-key".to_string());
        config.fish_audio_api_key = Some("fa-test-key".to_string());
        config.supertonic_url = Some("http://localhost:5040".to_string());
        config
    }

    #[test]
    fn test_create_provider() {
        let config = configured_config();
        assert!(create_provider("elevenlabs", &config).is_ok());
        assert!(create_provider("fish_audio", &config).is_ok());
        assert!(create_provider("supertonic", &config).is_ok());

        let invalid = create_provider("invalid", &config);
        assert!(matches!(invalid, Err(VoiceError::InvalidRequest(_))));
    }

    #[test]
    fn test_create_provider_unconfigured() {
        let config = ServerConfig::default();
        let result = create_provider("elevenlabs", &config);
        assert!(matches!(result, Err(VoiceError::ProviderUnconfigured(_))));
    }

    #[test]
    fn test_create_provider_aliases_and_case() {
        let config = configured_config();
        assert!(create_provider("ELEVENLABS", &config).is_ok());
        assert!(create_provider("eleven-labs", &config).is_ok());
        assert!(create_provider("Fish-Audio", &config).is_ok());
        assert!(create_provider("fish.audio", &config).is_ok());
    }

    #[test]
    fn test_registry_only_contains_configured_engines() {
        let registry = ProviderRegistry::from_config(&configured_config());

        assert!(registry.contains("elevenlabs"));
        assert!(registry.contains("fish"));
        assert!(registry.contains("supertonic"));
        assert!(!registry.contains("f5"));
        assert!(!registry.contains("openvoice"));
        assert_eq!(registry.engines().len(), 3);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ProviderRegistry::from_config(&ServerConfig::default());
        assert!(registry.is_empty());
        assert!(registry.get("elevenlabs").is_none());
    }

    #[test]
    fn test_audio_format_roundtrip() {
        assert_eq!(AudioFormat::Wav.as_str(), "wav");
        assert_eq!(AudioFormat::Wav.content_type(), "audio/wav");
        assert_eq!(AudioFormat::Mp3.content_type(), "audio/mpeg");
        assert_eq!(AudioFormat::from_str_or_default("linear16"), AudioFormat::Pcm16);
        assert_eq!(AudioFormat::from_str_or_default("unknown"), AudioFormat::Wav);
    }

    #[test]
    fn test_synthesis_params_defaults() {
        let params = SynthesisParams::new("voice-1");
        assert_eq!(params.audio_format, AudioFormat::Wav);
        assert_eq!(params.sample_rate, 24000);
        assert!(params.speed.is_none());
    }
}
