//! Configuration module for the Agentwood voice gateway.
//!
//! Handles server configuration from .env files, YAML files and environment
//! variables. Priority: YAML > ENV vars > .env values > defaults. The voice
//! catalog, provider mapping and routing policy are all constructed from
//! this object once at startup and injected into the pipeline; no
//! module-level registries.

use std::path::PathBuf;
use std::time::Duration;

mod env;
mod validation;
mod yaml;

pub use yaml::YamlConfig;

/// API secret authentication entry with a client identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthApiSecret {
    pub id: String,
    pub secret: String,
}

/// Server configuration
///
/// Contains everything needed to run the voice gateway:
/// - Server settings (host, port, CORS, rate limiting)
/// - TTS provider credentials and endpoints
/// - Engine routing preference order
/// - Audio cache bounds
/// - Voice catalog source and default seed
/// - Authentication settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // Provider credentials and endpoints
    /// ElevenLabs API key (per-character voice cloning, usually primary)
    pub elevenlabs_api_key: Option<String>,
    /// Override for the ElevenLabs API base URL (tests point this at mocks)
    pub elevenlabs_base_url: Option<String>,
    /// Fish Audio API key (cloud voice cloning, usual backup)
    pub fish_audio_api_key: Option<String>,
    pub fish_audio_base_url: Option<String>,
    /// RunPod serverless endpoint URL hosting F5-TTS
    pub f5_endpoint_url: Option<String>,
    /// RunPod API key for the F5 endpoint
    pub f5_api_key: Option<String>,
    /// Base URL of a local Supertonic server (no credential needed)
    pub supertonic_url: Option<String>,
    /// Base URL of a local OpenVoice server (no credential needed)
    pub openvoice_url: Option<String>,

    // Routing
    /// Ordered engine preference walked by the router. First configured
    /// engine with a voice mapping wins; the next one is the fallback.
    pub engine_preference: Vec<String>,
    /// Per-attempt provider timeout; an attempt past this is a failure
    /// eligible for fallback, never left to hang.
    pub provider_timeout_seconds: u64,

    // Cache configuration
    pub cache_max_entries: u64,
    pub cache_ttl_seconds: Option<u64>,

    // Voice catalog
    /// Optional YAML catalog file; built-in seeds are used when absent.
    pub voice_catalog_path: Option<PathBuf>,
    /// Seed assigned when a non-strict character has no resolvable voice.
    /// Strict characters hard-fail regardless of this setting.
    pub default_voice_seed: Option<String>,

    // Authentication configuration
    pub auth_api_secrets: Vec<AuthApiSecret>,
    pub auth_required: bool,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all).
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,
    pub rate_limit_requests_per_second: u32,
    pub rate_limit_burst_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3002,
            elevenlabs_api_key: None,
            elevenlabs_base_url: None,
            fish_audio_api_key: None,
            fish_audio_base_url: None,
            f5_endpoint_url: None,
            f5_api_key: None,
            supertonic_url: None,
            openvoice_url: None,
            engine_preference: vec!["elevenlabs".to_string(), "fish_audio".to_string()],
            provider_timeout_seconds: 8,
            cache_max_entries: 4096,
            cache_ttl_seconds: None,
            voice_catalog_path: None,
            default_voice_seed: None,
            auth_api_secrets: Vec::new(),
            auth_required: false,
            cors_allowed_origins: None,
            rate_limit_requests_per_second: 60,
            rate_limit_burst_size: 10,
        }
    }
}

/// Zeroize all secret fields when ServerConfig is dropped so credentials
/// do not linger in memory after use.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.elevenlabs_api_key {
            key.zeroize();
        }
        if let Some(ref mut key) = self.fish_audio_api_key {
            key.zeroize();
        }
        if let Some(ref mut key) = self.f5_api_key {
            key.zeroize();
        }
        for secret in &mut self.auth_api_secrets {
            secret.secret.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables (plus .env, which is
    /// loaded in main.rs at startup).
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = env::load_env_config()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base.
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = env::load_env_config()?;
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        yaml_config.apply(&mut config);
        validation::validate(&config)?;
        Ok(config)
    }

    /// Get the server address as a string in "host:port" format
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if API secret authentication is configured
    pub fn has_api_secret_auth(&self) -> bool {
        !self.auth_api_secrets.is_empty()
    }

    /// Find the API secret identifier that matches a bearer token
    pub fn find_api_secret_id(&self, token: &str) -> Option<&str> {
        self.auth_api_secrets
            .iter()
            .find(|entry| entry.secret == token)
            .map(|entry| entry.id.as_str())
    }

    /// The bounded per-attempt timeout applied to every provider call
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_seconds)
    }

    /// Get the API key for a cloud engine
    ///
    /// Local engines (supertonic, openvoice) authenticate by endpoint and
    /// return an error here; use [`Self::is_engine_configured`] for them.
    pub fn get_api_key(&self, engine: &str) -> Result<String, String> {
        match engine.to_lowercase().as_str() {
            "elevenlabs" | "eleven-labs" | "eleven_labs" => {
                self.elevenlabs_api_key.as_ref().cloned().ok_or_else(|| {
                    "ElevenLabs API key not configured in server environment".to_string()
                })
            }
            "fish_audio" | "fish-audio" | "fish" => {
                self.fish_audio_api_key.as_ref().cloned().ok_or_else(|| {
                    "Fish Audio API key not configured in server environment".to_string()
                })
            }
            "f5" | "f5-tts" | "f5_tts" => self
                .f5_api_key
                .as_ref()
                .cloned()
                .ok_or_else(|| "F5 RunPod API key not configured in server environment".to_string()),
            _ => Err(format!("Unsupported engine: {engine}")),
        }
    }

    /// Whether an engine has everything it needs to be constructed:
    /// a credential for the cloud engines, an endpoint for the rest.
    pub fn is_engine_configured(&self, engine: &str) -> bool {
        match engine.to_lowercase().as_str() {
            "elevenlabs" | "eleven-labs" | "eleven_labs" => self.elevenlabs_api_key.is_some(),
            "fish_audio" | "fish-audio" | "fish" => self.fish_audio_api_key.is_some(),
            "f5" | "f5-tts" | "f5_tts" => {
                self.f5_endpoint_url.is_some() && self.f5_api_key.is_some()
            }
            "supertonic" => self.supertonic_url.is_some(),
            "openvoice" | "open-voice" | "open_voice" => self.openvoice_url.is_some(),
            _ => false,
        }
    }
}

pub(crate) fn parse_auth_api_secrets_json(
    json_str: &str,
) -> Result<Vec<AuthApiSecret>, Box<dyn std::error::Error>> {
    #[derive(serde::Deserialize)]
    struct AuthApiSecretJson {
        id: String,
        secret: String,
    }

    let secrets: Vec<AuthApiSecretJson> = serde_json::from_str(json_str)
        .map_err(|e| format!("Invalid AUTH_API_SECRETS_JSON format: {e}"))?;

    Ok(secrets
        .into_iter()
        .map(|entry| AuthApiSecret {
            id: entry.id,
            secret: entry.secret,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_api_key_elevenlabs_success() {
        let mut config = ServerConfig::default();
        config.elevenlabs_api_key = Some("test-elevenlabs-key".to_string());

        let result = config.get_api_key("elevenlabs");
        assert_eq!(result.unwrap(), "test-elevenlabs-key");
    }

    #[test]
    fn test_get_api_key_missing() {
        let config = ServerConfig::default();

        let result = config.get_api_key("fish_audio");
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err(),
            "Fish Audio API key not configured in server environment"
        );
    }

    #[test]
    fn test_get_api_key_case_insensitive_and_aliases() {
        let mut config = ServerConfig::default();
        config.elevenlabs_api_key = Some("k1".to_string());
        config.fish_audio_api_key = Some("k2".to_string());

        assert_eq!(config.get_api_key("ELEVENLABS").unwrap(), "k1");
        assert_eq!(config.get_api_key("eleven-labs").unwrap(), "k1");
        assert_eq!(config.get_api_key("Fish-Audio").unwrap(), "k2");
        assert_eq!(config.get_api_key("fish").unwrap(), "k2");
    }

    #[test]
    fn test_get_api_key_unsupported_engine() {
        let config = ServerConfig::default();
        let result = config.get_api_key("unsupported_engine");
        assert_eq!(result.unwrap_err(), "Unsupported engine: unsupported_engine");
    }

    #[test]
    fn test_is_engine_configured() {
        let mut config = ServerConfig::default();
        config.elevenlabs_api_key = Some("key".to_string());
        config.supertonic_url = Some("http://localhost:5040".to_string());
        config.f5_endpoint_url = Some("https://api.runpod.ai/v2/abc".to_string());

        assert!(config.is_engine_configured("elevenlabs"));
        assert!(config.is_engine_configured("supertonic"));
        // F5 needs both endpoint and key
        assert!(!config.is_engine_configured("f5"));
        assert!(!config.is_engine_configured("fish_audio"));
        assert!(!config.is_engine_configured("openvoice"));
        assert!(!config.is_engine_configured("nonsense"));
    }

    #[test]
    fn test_find_api_secret_id() {
        let mut config = ServerConfig::default();
        config.auth_api_secrets = vec![
            AuthApiSecret {
                id: "client-a".to_string(),
                secret: "token-a".to_string(),
            },
            AuthApiSecret {
                id: "client-b".to_string(),
                secret: "token-b".to_string(),
            },
        ];
        config.auth_required = true;

        assert!(config.has_api_secret_auth());
        assert_eq!(config.find_api_secret_id("token-a"), Some("client-a"));
        assert_eq!(config.find_api_secret_id("missing"), None);
    }

    #[test]
    fn test_address_format() {
        let mut config = ServerConfig::default();
        config.host = "0.0.0.0".to_string();
        config.port = 8080;
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_parse_auth_api_secrets_json() {
        let parsed =
            parse_auth_api_secrets_json(r#"[{"id":"default","secret":"s3cret"}]"#).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "default");

        assert!(parse_auth_api_secrets_json("not json").is_err());
    }
}
