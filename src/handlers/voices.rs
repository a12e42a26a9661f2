//! Handlers for the voice catalog endpoints.

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::core::voice::VoiceSeed;
use crate::errors::voice_error::{VoiceError, VoiceResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct VoiceSummary {
    pub name: String,
    pub category: String,
    pub gender: String,
    pub age: String,
    pub tone: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct VoiceDetail {
    #[serde(flatten)]
    pub seed: VoiceSeed,
    /// Engines that both carry this seed and are currently configured
    pub available_engines: Vec<String>,
    /// Engines that carry this seed regardless of configuration
    pub mapped_engines: Vec<String>,
}

fn summarize(seed: &VoiceSeed) -> VoiceSummary {
    VoiceSummary {
        name: seed.name.clone(),
        category: seed.category.clone(),
        gender: seed.gender.as_str().to_string(),
        age: seed.age.as_str().to_string(),
        tone: seed.tone.clone(),
        description: seed.description.clone(),
    }
}

/// Handler for GET /voices - the full seed catalog, name-ordered.
pub async fn list_voices(State(state): State<Arc<AppState>>) -> Json<Vec<VoiceSummary>> {
    let voices = state.catalog.seeds().map(summarize).collect();
    Json(voices)
}

/// Handler for GET /voices/{name} - one seed with engine availability.
pub async fn get_voice(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> VoiceResult<Json<VoiceDetail>> {
    let seed = state
        .catalog
        .get(&name)
        .ok_or_else(|| VoiceError::VoiceNotFound(name.clone()))?;

    let mapped_engines: Vec<String> = state
        .voice_map
        .engines_for(&seed.name)
        .into_iter()
        .map(str::to_string)
        .collect();
    let available_engines = mapped_engines
        .iter()
        .filter(|engine| state.registry.contains(engine))
        .cloned()
        .collect();

    Ok(Json(VoiceDetail {
        seed: seed.clone(),
        available_engines,
        mapped_engines,
    }))
}
