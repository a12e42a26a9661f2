//! Deterministic cache key derivation.

use sha2::{Digest, Sha256};

use crate::core::tts::SynthesisParams;

/// Version prefix baked into the digest input so the addressing scheme
/// can change without serving stale entries.
const KEY_SCHEME: &str = "v1";

/// Derive the content address for a synthesis request.
///
/// Text is normalized (trimmed, lowercased) before hashing so casing
/// and surrounding whitespace do not fragment the cache. Every other
/// input is serialized in a fixed field order; the same request always
/// produces the same key, on any host.
pub fn cache_key(text: &str, engine: &str, params: &SynthesisParams) -> String {
    let normalized = text.trim().to_lowercase();
    let speed = params.speed.unwrap_or(1.0);
    let canonical = format!(
        "{KEY_SCHEME}|{normalized}|{voice}|{engine}|format={format}|rate={rate}|speed={speed:.3}",
        voice = params.voice_id,
        format = params.audio_format.as_str(),
        rate = params.sample_rate,
    );

    let digest = Sha256::digest(canonical.as_bytes());
    hex::encode(digest)
}
