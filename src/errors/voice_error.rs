//! Error taxonomy for the voice synthesis pipeline.
//!
//! The variants track who can act on the failure: `VoiceNotFound` and
//! `ProviderUnconfigured` are resolution/configuration problems that will
//! not self-heal within a request, `SynthesisFailed` is a runtime provider
//! failure eligible for fallback, and `AllEnginesFailed` is terminal for a
//! request after fallback is exhausted.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

pub type VoiceResult<T> = Result<T, VoiceError>;

/// One synthesis attempt that failed, kept for the terminal error report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineAttempt {
    /// Engine that was attempted
    pub engine: String,
    /// Provider HTTP status, when the provider was reachable
    pub status: Option<u16>,
    /// Provider diagnostic message (or transport/timeout description)
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum VoiceError {
    /// The character's voice binding does not resolve to any catalog seed
    /// or provider mapping. Fatal for strict-mode characters.
    #[error("voice not found: {0}")]
    VoiceNotFound(String),

    /// A required credential or endpoint is missing. Distinct from a
    /// runtime synthesis failure and never silently skipped.
    #[error("provider not configured: {0}")]
    ProviderUnconfigured(String),

    /// The provider was reachable but refused or failed the request.
    #[error("synthesis failed on {engine}: {message}")]
    SynthesisFailed {
        engine: String,
        status: Option<u16>,
        message: String,
    },

    /// Every engine the router was willing to try has failed.
    #[error("all engines failed after {} attempt(s)", attempts.len())]
    AllEnginesFailed { attempts: Vec<EngineAttempt> },

    /// Caller-side validation failure (empty text, malformed options).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A concurrent request already stored the same cache key. Benign,
    /// logged at debug level and never propagated to callers.
    #[error("cache entry already present for key {0}")]
    CacheWriteConflict(String),
}

impl VoiceError {
    /// Failures that fallback may recover from. Configuration and voice
    /// resolution errors are not retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, VoiceError::SynthesisFailed { .. })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            VoiceError::VoiceNotFound(_) => StatusCode::NOT_FOUND,
            VoiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            VoiceError::ProviderUnconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VoiceError::SynthesisFailed { .. } => StatusCode::BAD_GATEWAY,
            VoiceError::AllEnginesFailed { .. } => StatusCode::SERVICE_UNAVAILABLE,
            VoiceError::CacheWriteConflict(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for VoiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            VoiceError::AllEnginesFailed { attempts } => json!({
                "error": "voice unavailable",
                "detail": self.to_string(),
                "attempts": attempts,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability() {
        assert!(
            VoiceError::SynthesisFailed {
                engine: "elevenlabs".to_string(),
                status: Some(500),
                message: "quota exceeded".to_string(),
            }
            .is_recoverable()
        );
        assert!(!VoiceError::VoiceNotFound("ghost".to_string()).is_recoverable());
        assert!(!VoiceError::ProviderUnconfigured("elevenlabs".to_string()).is_recoverable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            VoiceError::VoiceNotFound("x".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            VoiceError::InvalidRequest("empty".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            VoiceError::AllEnginesFailed { attempts: vec![] }.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_all_engines_failed_message_counts_attempts() {
        let err = VoiceError::AllEnginesFailed {
            attempts: vec![
                EngineAttempt {
                    engine: "elevenlabs".to_string(),
                    status: Some(500),
                    reason: "server error".to_string(),
                },
                EngineAttempt {
                    engine: "fish_audio".to_string(),
                    status: None,
                    reason: "timed out".to_string(),
                },
            ],
        };
        assert!(err.to_string().contains("2 attempt(s)"));
    }
}
