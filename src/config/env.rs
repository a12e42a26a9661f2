//! Environment variable configuration loading.

use std::env;
use std::path::PathBuf;

use super::{ServerConfig, parse_auth_api_secrets_json};

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(
    name: &str,
    default: T,
) -> Result<T, Box<dyn std::error::Error>> {
    match env_opt(name) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| format!("Invalid value for {name}: {raw}").into()),
        None => Ok(default),
    }
}

/// Build a [`ServerConfig`] from environment variables, falling back to
/// defaults for anything unset.
pub(super) fn load_env_config() -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let defaults = ServerConfig::default();

    let engine_preference = match env_opt("ENGINE_PREFERENCE") {
        Some(raw) => raw
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        None => defaults.engine_preference.clone(),
    };

    let auth_api_secrets = match env_opt("AUTH_API_SECRETS_JSON") {
        Some(raw) => parse_auth_api_secrets_json(&raw)?,
        None => Vec::new(),
    };

    Ok(ServerConfig {
        host: env_opt("HOST").unwrap_or_else(|| defaults.host.clone()),
        port: env_parse("PORT", defaults.port)?,
        elevenlabs_api_key: env_opt("ELEVENLABS_API_KEY"),
        elevenlabs_base_url: env_opt("ELEVENLABS_BASE_URL"),
        fish_audio_api_key: env_opt("FISH_AUDIO_API_KEY"),
        fish_audio_base_url: env_opt("FISH_AUDIO_BASE_URL"),
        f5_endpoint_url: env_opt("F5_ENDPOINT_URL"),
        f5_api_key: env_opt("F5_API_KEY"),
        supertonic_url: env_opt("SUPERTONIC_URL"),
        openvoice_url: env_opt("OPENVOICE_URL"),
        engine_preference,
        provider_timeout_seconds: env_parse(
            "PROVIDER_TIMEOUT_SECONDS",
            defaults.provider_timeout_seconds,
        )?,
        cache_max_entries: env_parse("CACHE_MAX_ENTRIES", defaults.cache_max_entries)?,
        cache_ttl_seconds: env_opt("CACHE_TTL_SECONDS")
            .map(|raw| {
                raw.parse::<u64>()
                    .map_err(|_| format!("Invalid value for CACHE_TTL_SECONDS: {raw}"))
            })
            .transpose()?,
        voice_catalog_path: env_opt("VOICE_CATALOG_PATH").map(PathBuf::from),
        default_voice_seed: env_opt("DEFAULT_VOICE_SEED"),
        auth_api_secrets,
        auth_required: env_parse("AUTH_REQUIRED", false)?,
        cors_allowed_origins: env_opt("CORS_ALLOWED_ORIGINS"),
        rate_limit_requests_per_second: env_parse(
            "RATE_LIMIT_REQUESTS_PER_SECOND",
            defaults.rate_limit_requests_per_second,
        )?,
        rate_limit_burst_size: env_parse("RATE_LIMIT_BURST_SIZE", defaults.rate_limit_burst_size)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_gateway_env() {
        for name in [
            "HOST",
            "PORT",
            "ELEVENLABS_API_KEY",
            "ELEVENLABS_BASE_URL",
            "FISH_AUDIO_API_KEY",
            "FISH_AUDIO_BASE_URL",
            "F5_ENDPOINT_URL",
            "F5_API_KEY",
            "SUPERTONIC_URL",
            "OPENVOICE_URL",
            "ENGINE_PREFERENCE",
            "PROVIDER_TIMEOUT_SECONDS",
            "CACHE_MAX_ENTRIES",
            "CACHE_TTL_SECONDS",
            "VOICE_CATALOG_PATH",
            "DEFAULT_VOICE_SEED",
            "AUTH_API_SECRETS_JSON",
            "AUTH_REQUIRED",
            "CORS_ALLOWED_ORIGINS",
            "RATE_LIMIT_REQUESTS_PER_SECOND",
            "RATE_LIMIT_BURST_SIZE",
        ] {
            // SAFETY: test-only environment mutation, serialized by #[serial]
            unsafe {
                env::remove_var(name);
            }
        }
    }

    #[test]
    #[serial]
    fn test_load_env_defaults() {
        clear_gateway_env();

        let config = load_env_config().unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3002);
        assert_eq!(config.engine_preference, vec!["elevenlabs", "fish_audio"]);
        assert_eq!(config.cache_max_entries, 4096);
        assert!(config.elevenlabs_api_key.is_none());
        assert!(!config.auth_required);
    }

    #[test]
    #[serial]
    fn test_load_env_overrides() {
        clear_gateway_env();
        // SAFETY: test-only environment mutation, serialized by #[serial]
        unsafe {
            env::set_var("PORT", "9000");
            env::set_var("ELEVENLABS_API_KEY", "xi-key");
            env::set_var("ENGINE_PREFERENCE", "Fish_Audio, supertonic");
            env::set_var("CACHE_TTL_SECONDS", "600");
        }

        let config = load_env_config().unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.elevenlabs_api_key.as_deref(), Some("xi-key"));
        assert_eq!(config.engine_preference, vec!["fish_audio", "supertonic"]);
        assert_eq!(config.cache_ttl_seconds, Some(600));

        clear_gateway_env();
    }

    #[test]
    #[serial]
    fn test_load_env_invalid_port() {
        clear_gateway_env();
        // SAFETY: test-only environment mutation, serialized by #[serial]
        unsafe {
            env::set_var("PORT", "not-a-port");
        }

        let result = load_env_config();
        assert!(result.is_err());

        clear_gateway_env();
    }
}
