pub mod auth_error;
pub mod voice_error;

pub use auth_error::{AuthError, AuthResult};
pub use voice_error::{EngineAttempt, VoiceError, VoiceResult};
