//! Per-provider voice id tables.
//!
//! A catalog seed is an abstract identity; each synthesis engine knows
//! it under a different concrete id (an ElevenLabs voice id, a Fish
//! Audio reference id, a reference-audio path for cloning engines).

use std::collections::HashMap;

use crate::core::tts::{ENGINE_ELEVENLABS, ENGINE_F5, ENGINE_FISH_AUDIO, ENGINE_OPENVOICE, ENGINE_SUPERTONIC};
use crate::errors::voice_error::{VoiceError, VoiceResult};

/// Mapping from (engine, seed name) to the engine-native voice id.
#[derive(Debug, Default)]
pub struct ProviderVoiceMap {
    by_engine: HashMap<String, HashMap<String, String>>,
}

impl ProviderVoiceMap {
    /// The built-in mapping for the default seed set.
    pub fn with_default_mappings() -> Self {
        let mut map = Self::default();
        for (engine, seed, voice_id) in default_mappings() {
            // Defaults are conflict-free by construction
            map.insert(engine, seed, voice_id)
                .expect("built-in voice mapping has conflicts");
        }
        map
    }

    /// Register a voice id for a seed on an engine.
    ///
    /// Re-inserting the identical pair is a no-op; registering a
    /// different id for an existing pair is rejected.
    pub fn insert(&mut self, engine: &str, seed: &str, voice_id: &str) -> VoiceResult<()> {
        let entries = self.by_engine.entry(engine.to_string()).or_default();
        if let Some(existing) = entries.get(seed) {
            if existing == voice_id {
                return Ok(());
            }
            return Err(VoiceError::InvalidRequest(format!(
                "conflicting voice id for seed '{seed}' on engine '{engine}': '{existing}' vs '{voice_id}'"
            )));
        }
        entries.insert(seed.to_string(), voice_id.to_string());
        Ok(())
    }

    /// The engine-native voice id for a seed, if the engine carries it.
    pub fn voice_id_for(&self, engine: &str, seed: &str) -> Option<&str> {
        self.by_engine
            .get(engine)?
            .get(seed)
            .map(String::as_str)
    }

    /// Whether a seed can be served by an engine at all.
    pub fn is_mapped(&self, engine: &str, seed: &str) -> bool {
        self.voice_id_for(engine, seed).is_some()
    }

    /// Engines that carry a given seed.
    pub fn engines_for(&self, seed: &str) -> Vec<&str> {
        let mut engines: Vec<&str> = self
            .by_engine
            .iter()
            .filter(|(_, entries)| entries.contains_key(seed))
            .map(|(engine, _)| engine.as_str())
            .collect();
        engines.sort_unstable();
        engines
    }
}

fn default_mappings() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        // ElevenLabs premade and cloned voice ids
        (ENGINE_ELEVENLABS, "FemmeFatale", "pMsXgVXv3BLzUgSXRplE"),
        (ENGINE_ELEVENLABS, "MidnightWhisper", "TxGEqnHWrfWFTfGW9XjX"),
        (ENGINE_ELEVENLABS, "GravelNarrator", "VR6AewLTigWG4xSOukaG"),
        (ENGINE_ELEVENLABS, "SunnyMentor", "EXAVITQu4vr4xnSDxMaL"),
        (ENGINE_ELEVENLABS, "VelvetVillain", "onwK4e9ZLuTAKqWW03F9"),
        (ENGINE_ELEVENLABS, "SparkCompanion", "jBpfuIE2acCO8z3wKNLl"),
        (ENGINE_ELEVENLABS, "IronSergeant", "N2lVS1w4EtoT3dr4eOWO"),
        (ENGINE_ELEVENLABS, "QuietLibrarian", "XB0fDUnXU5powFXDhCwa"),
        // Fish Audio reference model ids
        (ENGINE_FISH_AUDIO, "FemmeFatale", "632e9b5209da4d3c8dc11e7f6ea503f6"),
        (ENGINE_FISH_AUDIO, "MidnightWhisper", "b82f05a2f1e14a7c9d8821364cc10203"),
        (ENGINE_FISH_AUDIO, "GravelNarrator", "7f92f8afb8ec43bf81429cc1c9199cb1"),
        (ENGINE_FISH_AUDIO, "SunnyMentor", "59cb5986671546eaa6ca8ae6f29f6d22"),
        (ENGINE_FISH_AUDIO, "SparkCompanion", "eb68a2351e264eb5ae1c7a1a58b7a00e"),
        (ENGINE_FISH_AUDIO, "QuietLibrarian", "3b55b3d84d2f453a98d8ca9bb24182d6"),
        // Supertonic ships a small fixed preset bank
        (ENGINE_SUPERTONIC, "SunnyMentor", "supertonic_f1"),
        (ENGINE_SUPERTONIC, "IronSergeant", "supertonic_m2"),
        // Cloning engines take the seed's reference audio directly
        (ENGINE_F5, "FemmeFatale", "seeds/femme_fatale.wav"),
        (ENGINE_F5, "GravelNarrator", "seeds/gravel_narrator.wav"),
        (ENGINE_F5, "QuietLibrarian", "seeds/quiet_librarian.wav"),
        (ENGINE_OPENVOICE, "MidnightWhisper", "seeds/midnight_whisper.wav"),
        (ENGINE_OPENVOICE, "VelvetVillain", "seeds/velvet_villain.wav"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mappings_resolve() {
        let map = ProviderVoiceMap::with_default_mappings();
        assert_eq!(
            map.voice_id_for(ENGINE_ELEVENLABS, "FemmeFatale"),
            Some("pMsXgVXv3BLzUgSXRplE")
        );
        assert!(map.voice_id_for(ENGINE_SUPERTONIC, "FemmeFatale").is_none());
    }

    #[test]
    fn test_insert_idempotent_for_identical_pair() {
        let mut map = ProviderVoiceMap::default();
        map.insert("elevenlabs", "Seed", "abc").unwrap();
        map.insert("elevenlabs", "Seed", "abc").unwrap();
        assert_eq!(map.voice_id_for("elevenlabs", "Seed"), Some("abc"));
    }

    #[test]
    fn test_insert_rejects_conflicting_id() {
        let mut map = ProviderVoiceMap::default();
        map.insert("elevenlabs", "Seed", "abc").unwrap();
        let result = map.insert("elevenlabs", "Seed", "xyz");
        assert!(matches!(result, Err(VoiceError::InvalidRequest(_))));
    }

    #[test]
    fn test_engines_for_seed() {
        let map = ProviderVoiceMap::with_default_mappings();
        let engines = map.engines_for("FemmeFatale");
        assert!(engines.contains(&ENGINE_ELEVENLABS));
        assert!(engines.contains(&ENGINE_FISH_AUDIO));
        assert!(engines.contains(&ENGINE_F5));
        assert!(!engines.contains(&ENGINE_SUPERTONIC));
    }
}
