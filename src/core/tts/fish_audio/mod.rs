//! Fish Audio TTS provider.
//!
//! Cloud voice-cloning backend used as the usual fallback behind
//! ElevenLabs. Voices are referenced by Fish Audio model ids
//! (`reference_id`), one per catalog seed.
//!
//! # API Reference
//!
//! - Endpoint: `POST /v1/tts`
//! - Auth: `Authorization: Bearer <api key>`
//! - Output: wav, mp3 or raw PCM
//! - Health probe: `GET /v1/wallet`

mod config;
mod provider;

pub use config::FishAudioModel;
pub use provider::{FISH_AUDIO_BASE_URL, FishAudioTts};
