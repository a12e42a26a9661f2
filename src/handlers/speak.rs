//! Handler for POST /speak - the synthesis entry point.

use axum::{Extension, extract::State, response::Json};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::pipeline::SpeakOptions;
use crate::core::tts::AudioFormat;
use crate::core::voice::VoiceRef;
use crate::errors::voice_error::{VoiceError, VoiceResult};
use crate::middleware::UserContext;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct SpeakRequest {
    /// Text to synthesize
    pub text: String,
    /// The character's voice binding
    pub voice: VoiceRef,
    /// Force a specific engine, bypassing routing preference
    #[serde(default)]
    pub engine: Option<String>,
    /// Output format name: wav, mp3 or pcm
    #[serde(default)]
    pub audio_format: Option<String>,
    #[serde(default)]
    pub sample_rate: Option<u32>,
    /// Speaking speed multiplier
    #[serde(default)]
    pub speed: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct SpeakResponse {
    /// Base64-encoded audio payload
    pub audio: String,
    pub content_type: String,
    pub format: String,
    pub sample_rate: u32,
    /// Engine that actually produced the audio
    pub served_by_engine: String,
    pub cache_hit: bool,
    pub hit_count: u64,
}

pub async fn speak_handler(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<UserContext>>,
    Json(request): Json<SpeakRequest>,
) -> VoiceResult<Json<SpeakResponse>> {
    let audio_format = match request.audio_format.as_deref() {
        Some(name) => Some(parse_audio_format(name)?),
        None => None,
    };
    let options = SpeakOptions {
        forced_engine: request.engine.clone(),
        audio_format,
        sample_rate: request.sample_rate,
        speed: request.speed,
    };

    if let Some(Extension(user)) = &user {
        tracing::debug!(
            client_id = ?user.client_id,
            user_id = ?user.user_id,
            chars = request.text.len(),
            "Speak request received"
        );
    }

    let result = state
        .pipeline
        .synthesize_speech(&request.text, &request.voice, &options)
        .await?;

    Ok(Json(SpeakResponse {
        audio: base64::engine::general_purpose::STANDARD.encode(&result.audio),
        content_type: result.content_type,
        format: result.format.as_str().to_string(),
        sample_rate: result.sample_rate,
        served_by_engine: result.served_by_engine,
        cache_hit: result.cache_hit,
        hit_count: result.hit_count,
    }))
}

/// Unknown format names are rejected rather than silently defaulted,
/// since the caller declared an explicit expectation.
fn parse_audio_format(name: &str) -> VoiceResult<AudioFormat> {
    match name.to_lowercase().as_str() {
        "wav" => Ok(AudioFormat::Wav),
        "mp3" => Ok(AudioFormat::Mp3),
        "pcm" | "pcm16" => Ok(AudioFormat::Pcm16),
        other => Err(VoiceError::InvalidRequest(format!(
            "unsupported audio format: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speak_request_minimal_deserialization() {
        let json = r#"{
            "text": "Hello there",
            "voice": { "seed_id": "FemmeFatale" }
        }"#;

        let request: SpeakRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.text, "Hello there");
        assert_eq!(request.voice.seed_id.as_deref(), Some("FemmeFatale"));
        assert!(request.voice.strict);
        assert!(request.engine.is_none());
    }

    #[test]
    fn test_speak_request_full_deserialization() {
        let json = r#"{
            "text": "Hello",
            "voice": { "legacy_name": "old narrator", "strict": false },
            "engine": "fish_audio",
            "audio_format": "mp3",
            "sample_rate": 44100,
            "speed": 1.1
        }"#;

        let request: SpeakRequest = serde_json::from_str(json).unwrap();
        assert!(!request.voice.strict);
        assert_eq!(request.engine.as_deref(), Some("fish_audio"));
        assert_eq!(request.audio_format.as_deref(), Some("mp3"));
        assert_eq!(request.sample_rate, Some(44100));
    }

    #[test]
    fn test_parse_audio_format() {
        assert_eq!(parse_audio_format("WAV").unwrap(), AudioFormat::Wav);
        assert_eq!(parse_audio_format("pcm16").unwrap(), AudioFormat::Pcm16);
        assert!(matches!(
            parse_audio_format("flac"),
            Err(VoiceError::InvalidRequest(_))
        ));
    }
}
