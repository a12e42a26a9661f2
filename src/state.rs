//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::core::cache::AudioCache;
use crate::core::pipeline::SpeechPipeline;
use crate::core::tts::ProviderRegistry;
use crate::core::voice::{ProviderVoiceMap, VoiceCatalog};
use crate::errors::voice_error::VoiceResult;

pub struct AppState {
    pub config: ServerConfig,
    pub catalog: Arc<VoiceCatalog>,
    pub voice_map: Arc<ProviderVoiceMap>,
    pub registry: Arc<ProviderRegistry>,
    pub cache: Arc<AudioCache>,
    pub pipeline: SpeechPipeline,
}

impl AppState {
    pub fn new(config: ServerConfig) -> VoiceResult<Arc<Self>> {
        let mut catalog = match &config.voice_catalog_path {
            Some(path) => VoiceCatalog::from_yaml_file(path)?,
            None => VoiceCatalog::with_default_seeds(),
        };
        if let Some(default_seed) = &config.default_voice_seed {
            catalog.set_default_seed(default_seed)?;
        }
        let catalog = Arc::new(catalog);

        let voice_map = Arc::new(ProviderVoiceMap::with_default_mappings());
        let registry = Arc::new(ProviderRegistry::from_config(&config));
        if registry.is_empty() {
            tracing::warn!("No synthesis engines configured, every speak request will fail");
        } else {
            tracing::info!(engines = ?registry.engines(), "Synthesis engines ready");
        }

        let cache = Arc::new(AudioCache::new(
            config.cache_max_entries,
            config.cache_ttl_seconds.map(Duration::from_secs),
        ));

        let pipeline = SpeechPipeline::new(
            catalog.clone(),
            voice_map.clone(),
            registry.clone(),
            cache.clone(),
            config.engine_preference.clone(),
            config.provider_timeout(),
        );

        Ok(Arc::new(Self {
            config,
            catalog,
            voice_map,
            registry,
            cache,
            pipeline,
        }))
    }
}
