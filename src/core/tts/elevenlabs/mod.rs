//! ElevenLabs TTS provider.
//!
//! ElevenLabs is the primary engine for Agentwood characters because it is
//! the one backend offering true per-character voice cloning: every seed
//! in the catalog maps to a distinct cloned voice rather than a slot in a
//! small preset bank.
//!
//! # API Reference
//!
//! - Endpoint: `POST /v1/text-to-speech/{voice_id}`
//! - Auth: `xi-api-key` header
//! - Output: mp3 and raw PCM at several sample rates
//! - Health probe: `GET /v1/user`

mod config;
mod provider;

pub use config::{ElevenLabsModel, VoiceSettings};
pub use provider::{ELEVENLABS_BASE_URL, ElevenLabsTts};
