//! Engine selection for a resolved voice seed.

use std::collections::HashSet;
use std::sync::Arc;

use super::mapping::ProviderVoiceMap;
use crate::core::tts::canonical_engine_name;
use crate::errors::voice_error::{VoiceError, VoiceResult};

/// The outcome of routing: which engine serves the request, with the
/// engine-native voice id to use and why it was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct RouterDecision {
    pub engine: String,
    pub voice_id: String,
    pub reason: String,
}

/// Picks a synthesis engine for a seed without touching the network.
///
/// Routing only considers engines that are both configured (present in
/// the provider registry) and carry a voice id for the seed.
#[derive(Debug)]
pub struct VoiceRouter {
    preference: Vec<String>,
    available: HashSet<String>,
    map: Arc<ProviderVoiceMap>,
}

impl VoiceRouter {
    pub fn new(
        preference: Vec<String>,
        available: impl IntoIterator<Item = String>,
        map: Arc<ProviderVoiceMap>,
    ) -> Self {
        Self {
            preference,
            available: available.into_iter().collect(),
            map,
        }
    }

    /// Select the primary engine for a seed.
    ///
    /// A forced engine overrides the preference order unconditionally,
    /// but must still be configured and carry the seed.
    pub fn select(&self, seed_name: &str, forced: Option<&str>) -> VoiceResult<RouterDecision> {
        if let Some(forced) = forced {
            let engine = canonical_engine_name(forced).ok_or_else(|| {
                VoiceError::InvalidRequest(format!("unknown synthesis engine: {forced}"))
            })?;
            if !self.available.contains(engine) {
                return Err(VoiceError::ProviderUnconfigured(engine.to_string()));
            }
            let voice_id = self.map.voice_id_for(engine, seed_name).ok_or_else(|| {
                VoiceError::VoiceNotFound(format!(
                    "seed '{seed_name}' has no voice mapping on forced engine '{engine}'"
                ))
            })?;
            return Ok(RouterDecision {
                engine: engine.to_string(),
                voice_id: voice_id.to_string(),
                reason: "forced by request".to_string(),
            });
        }

        self.first_serving(seed_name, None)
    }

    /// Select a backup engine, skipping the engine that already failed.
    pub fn backup_for(&self, seed_name: &str, exclude: &str) -> Option<RouterDecision> {
        self.first_serving(seed_name, Some(exclude)).ok()
    }

    fn first_serving(&self, seed_name: &str, exclude: Option<&str>) -> VoiceResult<RouterDecision> {
        let mut saw_unconfigured = false;
        for engine in &self.preference {
            if exclude == Some(engine.as_str()) {
                continue;
            }
            if !self.map.is_mapped(engine, seed_name) {
                continue;
            }
            if !self.available.contains(engine) {
                saw_unconfigured = true;
                continue;
            }
            let voice_id = self
                .map
                .voice_id_for(engine, seed_name)
                .expect("mapping checked above")
                .to_string();
            return Ok(RouterDecision {
                engine: engine.clone(),
                voice_id,
                reason: "preference order".to_string(),
            });
        }

        if saw_unconfigured {
            Err(VoiceError::ProviderUnconfigured(format!(
                "engines carrying seed '{seed_name}' are not configured"
            )))
        } else {
            Err(VoiceError::VoiceNotFound(format!(
                "no preferred engine carries seed '{seed_name}'"
            )))
        }
    }
}
