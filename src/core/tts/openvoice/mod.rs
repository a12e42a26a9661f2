//! OpenVoice TTS provider.
//!
//! Local/offline cloning engine. Clones from reference audio like F5, so
//! its mapped "voice id" is the seed's reference audio path. Kept for
//! air-gapped deployments where no cloud engine is reachable.

mod provider;

pub use provider::OpenVoiceTts;
