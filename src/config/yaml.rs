//! YAML configuration file loading.
//!
//! Every field is optional; values present in the file override the
//! environment base built by `env.rs`.
//!
//! # Example YAML
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 3002
//! providers:
//!   elevenlabs_api_key: "xi-..."
//!   fish_audio_api_key: "fa-..."
//!   supertonic_url: "http://localhost:5040"
//! routing:
//!   engine_preference: [elevenlabs, fish_audio]
//!   provider_timeout_seconds: 8
//! cache:
//!   max_entries: 4096
//!   ttl_seconds: 86400
//! voices:
//!   catalog_path: "voices.yaml"
//!   default_seed: "SunnyMentor"
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use super::{AuthApiSecret, ServerConfig};

#[derive(Debug, Default, Deserialize)]
pub struct YamlConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub providers: ProvidersSection,
    #[serde(default)]
    pub routing: RoutingSection,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub voices: VoicesSection,
    #[serde(default)]
    pub auth: AuthSection,
    #[serde(default)]
    pub security: SecuritySection,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProvidersSection {
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: Option<String>,
    pub fish_audio_api_key: Option<String>,
    pub fish_audio_base_url: Option<String>,
    pub f5_endpoint_url: Option<String>,
    pub f5_api_key: Option<String>,
    pub supertonic_url: Option<String>,
    pub openvoice_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RoutingSection {
    pub engine_preference: Option<Vec<String>>,
    pub provider_timeout_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CacheSection {
    pub max_entries: Option<u64>,
    pub ttl_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VoicesSection {
    pub catalog_path: Option<PathBuf>,
    pub default_seed: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthSection {
    pub required: Option<bool>,
    #[serde(default)]
    pub api_secrets: Vec<AuthApiSecretYaml>,
}

#[derive(Debug, Deserialize)]
pub struct AuthApiSecretYaml {
    pub id: String,
    pub secret: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SecuritySection {
    pub cors_allowed_origins: Option<String>,
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Overlay the YAML values onto an environment-derived base config.
    pub fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.server.host {
            config.host = host;
        }
        if let Some(port) = self.server.port {
            config.port = port;
        }

        let p = self.providers;
        if p.elevenlabs_api_key.is_some() {
            config.elevenlabs_api_key = p.elevenlabs_api_key;
        }
        if p.elevenlabs_base_url.is_some() {
            config.elevenlabs_base_url = p.elevenlabs_base_url;
        }
        if p.fish_audio_api_key.is_some() {
            config.fish_audio_api_key = p.fish_audio_api_key;
        }
        if p.fish_audio_base_url.is_some() {
            config.fish_audio_base_url = p.fish_audio_base_url;
        }
        if p.f5_endpoint_url.is_some() {
            config.f5_endpoint_url = p.f5_endpoint_url;
        }
        if p.f5_api_key.is_some() {
            config.f5_api_key = p.f5_api_key;
        }
        if p.supertonic_url.is_some() {
            config.supertonic_url = p.supertonic_url;
        }
        if p.openvoice_url.is_some() {
            config.openvoice_url = p.openvoice_url;
        }

        if let Some(preference) = self.routing.engine_preference {
            config.engine_preference = preference
                .into_iter()
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
        }
        if let Some(timeout) = self.routing.provider_timeout_seconds {
            config.provider_timeout_seconds = timeout;
        }

        if let Some(max_entries) = self.cache.max_entries {
            config.cache_max_entries = max_entries;
        }
        if self.cache.ttl_seconds.is_some() {
            config.cache_ttl_seconds = self.cache.ttl_seconds;
        }

        if self.voices.catalog_path.is_some() {
            config.voice_catalog_path = self.voices.catalog_path;
        }
        if self.voices.default_seed.is_some() {
            config.default_voice_seed = self.voices.default_seed;
        }

        if let Some(required) = self.auth.required {
            config.auth_required = required;
        }
        if !self.auth.api_secrets.is_empty() {
            config.auth_api_secrets = self
                .auth
                .api_secrets
                .into_iter()
                .map(|entry| AuthApiSecret {
                    id: entry.id,
                    secret: entry.secret,
                })
                .collect();
        }

        if self.security.cors_allowed_origins.is_some() {
            config.cors_allowed_origins = self.security.cors_allowed_origins;
        }
        if let Some(rps) = self.security.rate_limit_requests_per_second {
            config.rate_limit_requests_per_second = rps;
        }
        if let Some(burst) = self.security.rate_limit_burst_size {
            config.rate_limit_burst_size = burst;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_overrides_env_base() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
server:
  port: 4100
providers:
  elevenlabs_api_key: "yaml-key"
routing:
  engine_preference: [Fish_Audio, elevenlabs]
cache:
  max_entries: 128
  ttl_seconds: 60
voices:
  default_seed: "SunnyMentor"
"#
        )
        .unwrap();

        let yaml = YamlConfig::from_file(&file.path().to_path_buf()).unwrap();
        let mut config = ServerConfig::default();
        config.elevenlabs_api_key = Some("env-key".to_string());
        yaml.apply(&mut config);

        assert_eq!(config.port, 4100);
        assert_eq!(config.elevenlabs_api_key.as_deref(), Some("yaml-key"));
        assert_eq!(config.engine_preference, vec!["fish_audio", "elevenlabs"]);
        assert_eq!(config.cache_max_entries, 128);
        assert_eq!(config.cache_ttl_seconds, Some(60));
        assert_eq!(config.default_voice_seed.as_deref(), Some("SunnyMentor"));
        // Untouched fields keep their base values
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_empty_yaml_changes_nothing() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let yaml = YamlConfig::from_file(&file.path().to_path_buf()).unwrap();
        let mut config = ServerConfig::default();
        yaml.apply(&mut config);

        assert_eq!(config.port, 3002);
        assert_eq!(config.engine_preference, vec!["elevenlabs", "fish_audio"]);
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server: [not: a: mapping").unwrap();

        let result = YamlConfig::from_file(&file.path().to_path_buf());
        assert!(result.is_err());
    }
}
