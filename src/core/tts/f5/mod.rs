//! F5-TTS provider on a RunPod serverless endpoint.
//!
//! The pooled GPU endpoint clones from a reference audio clip per request;
//! the mapped "voice id" for this engine is the seed's reference audio
//! path. Responses come back as base64 inside a RunPod job envelope.

mod provider;

pub use provider::F5Tts;
