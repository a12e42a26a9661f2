//! Configuration validation logic.

use super::ServerConfig;

const KNOWN_ENGINES: &[&str] = &["elevenlabs", "fish_audio", "f5", "supertonic", "openvoice"];

pub(super) fn validate(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.engine_preference.is_empty() {
        return Err("engine_preference must name at least one engine".into());
    }

    for engine in &config.engine_preference {
        if !KNOWN_ENGINES.contains(&engine.as_str()) {
            return Err(format!(
                "Unknown engine '{engine}' in engine_preference. Known engines: {}",
                KNOWN_ENGINES.join(", ")
            )
            .into());
        }
    }

    if config.provider_timeout_seconds == 0 {
        return Err("provider_timeout_seconds must be greater than zero".into());
    }

    if config.cache_max_entries == 0 {
        return Err("cache_max_entries must be greater than zero".into());
    }

    for secret in &config.auth_api_secrets {
        if secret.id.trim().is_empty() || secret.secret.trim().is_empty() {
            return Err("auth api secrets must have a non-empty id and secret".into());
        }
    }

    if config.auth_required && config.auth_api_secrets.is_empty() {
        return Err("auth_required is set but no API secrets are configured".into());
    }

    Ok(())
}
