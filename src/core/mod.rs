//! Core voice synthesis functionality.
//!
//! - `voice`: the seed catalog, provider voice mapping and routing policy
//! - `tts`: one thin synthesis client per TTS engine behind a common trait
//! - `cache`: content-addressed cache of synthesized audio
//! - `pipeline`: the fallback orchestrator tying the above together

pub mod cache;
pub mod pipeline;
pub mod tts;
pub mod voice;

pub use cache::{AudioCache, CacheEntry, cache_key};
pub use pipeline::{SpeakOptions, SpeechPipeline, SpeechResult};
pub use tts::{
    AudioFormat, ProviderHealth, ProviderRegistry, SynthesisParams, SynthesisProvider,
    SynthesizedAudio, create_provider,
};
pub use voice::{
    ProviderVoiceMap, RouterDecision, VoiceCatalog, VoiceRef, VoiceRouter, VoiceSeed,
};
