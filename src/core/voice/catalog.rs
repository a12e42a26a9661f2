//! Voice catalog: loads seeds and resolves character voice bindings.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::seed::{AgeBand, Gender, VoiceRef, VoiceSeed};
use crate::errors::voice_error::{VoiceError, VoiceResult};

/// The catalog of voice seeds, constructed once at startup and read-only
/// at request time.
#[derive(Debug, Default)]
pub struct VoiceCatalog {
    seeds: BTreeMap<String, VoiceSeed>,
    /// Seed handed to non-strict characters with no resolvable binding
    default_seed: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    seeds: Vec<VoiceSeed>,
    #[serde(default)]
    default_seed: Option<String>,
}

impl VoiceCatalog {
    /// The built-in Agentwood seed set, used when no catalog file is
    /// configured.
    pub fn with_default_seeds() -> Self {
        let mut catalog = Self::default();
        for seed in default_seeds() {
            // Built-in names are unique by construction
            catalog
                .insert(seed)
                .expect("built-in catalog has duplicate seed names");
        }
        catalog
    }

    /// Load a catalog from a YAML file.
    pub fn from_yaml_file(path: &Path) -> VoiceResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            VoiceError::InvalidRequest(format!(
                "failed to read voice catalog {}: {e}",
                path.display()
            ))
        })?;
        let file: CatalogFile = serde_yaml::from_str(&contents).map_err(|e| {
            VoiceError::InvalidRequest(format!(
                "failed to parse voice catalog {}: {e}",
                path.display()
            ))
        })?;

        let mut catalog = Self::default();
        for seed in file.seeds {
            catalog.insert(seed)?;
        }
        if let Some(default_seed) = file.default_seed {
            catalog.set_default_seed(&default_seed)?;
        }
        Ok(catalog)
    }

    /// Insert a seed, enforcing name uniqueness.
    pub fn insert(&mut self, seed: VoiceSeed) -> VoiceResult<()> {
        if seed.name.trim().is_empty() {
            return Err(VoiceError::InvalidRequest(
                "voice seed name must not be empty".to_string(),
            ));
        }
        if self.seeds.contains_key(&seed.name) {
            return Err(VoiceError::InvalidRequest(format!(
                "duplicate voice seed name: {}",
                seed.name
            )));
        }
        self.seeds.insert(seed.name.clone(), seed);
        Ok(())
    }

    /// Designate the fallback seed for non-strict characters. Must name
    /// an existing seed.
    pub fn set_default_seed(&mut self, name: &str) -> VoiceResult<()> {
        if !self.seeds.contains_key(name) {
            return Err(VoiceError::VoiceNotFound(format!(
                "default seed '{name}' is not in the catalog"
            )));
        }
        self.default_seed = Some(name.to_string());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&VoiceSeed> {
        self.seeds.get(name)
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// All seeds in name order.
    pub fn seeds(&self) -> impl Iterator<Item = &VoiceSeed> {
        self.seeds.values()
    }

    /// Resolve a character's voice binding to a catalog seed.
    ///
    /// Seed-id lookup takes precedence over the legacy free-text name
    /// (matched case-insensitively). When neither resolves, strict
    /// bindings fail with [`VoiceError::VoiceNotFound`]; non-strict
    /// bindings fall back to the catalog's designated default seed, and
    /// fail if none is designated.
    pub fn resolve(&self, voice_ref: &VoiceRef) -> VoiceResult<&VoiceSeed> {
        if let Some(seed_id) = voice_ref.seed_id.as_deref() {
            if let Some(seed) = self.seeds.get(seed_id) {
                return Ok(seed);
            }
            // An explicit but unknown seed id is an error even for
            // non-strict bindings aimed at a legacy name fallback
            if voice_ref.strict {
                return Err(VoiceError::VoiceNotFound(format!(
                    "voice seed '{seed_id}' is not in the catalog"
                )));
            }
        }

        if let Some(legacy_name) = voice_ref.legacy_name.as_deref() {
            let wanted = legacy_name.trim().to_lowercase();
            if let Some(seed) = self
                .seeds
                .values()
                .find(|seed| seed.name.to_lowercase() == wanted)
            {
                return Ok(seed);
            }
            if voice_ref.strict {
                return Err(VoiceError::VoiceNotFound(format!(
                    "legacy voice name '{legacy_name}' does not match any seed"
                )));
            }
        }

        if !voice_ref.strict {
            if let Some(default_name) = self.default_seed.as_deref() {
                if let Some(seed) = self.seeds.get(default_name) {
                    tracing::debug!(seed = default_name, "Assigned default voice seed");
                    return Ok(seed);
                }
            }
        }

        Err(VoiceError::VoiceNotFound(
            "character has no resolvable voice binding".to_string(),
        ))
    }
}

fn default_seeds() -> Vec<VoiceSeed> {
    vec![
        VoiceSeed {
            name: "FemmeFatale".to_string(),
            category: "Villain".to_string(),
            gender: Gender::Female,
            age: AgeBand::Adult,
            tone: "sultry".to_string(),
            energy: "low".to_string(),
            accent: "transatlantic".to_string(),
            reference_audio: Some("seeds/femme_fatale.wav".to_string()),
            description: "Smoky, deliberate delivery with a knowing edge.".to_string(),
            tags: vec!["noir".to_string(), "seductive".to_string()],
            suitable_for: vec!["antagonist".to_string(), "spy".to_string()],
        },
        VoiceSeed {
            name: "MidnightWhisper".to_string(),
            category: "Male ASMR".to_string(),
            gender: Gender::Male,
            age: AgeBand::Adult,
            tone: "hushed".to_string(),
            energy: "low".to_string(),
            accent: "american".to_string(),
            reference_audio: Some("seeds/midnight_whisper.wav".to_string()),
            description: "Close-mic whisper for wind-down sessions.".to_string(),
            tags: vec!["asmr".to_string(), "calm".to_string()],
            suitable_for: vec!["companion".to_string(), "sleep-aid".to_string()],
        },
        VoiceSeed {
            name: "GravelNarrator".to_string(),
            category: "Narrator".to_string(),
            gender: Gender::Male,
            age: AgeBand::Mature,
            tone: "gravelly".to_string(),
            energy: "measured".to_string(),
            accent: "british".to_string(),
            reference_audio: Some("seeds/gravel_narrator.wav".to_string()),
            description: "Weathered documentary narrator.".to_string(),
            tags: vec!["narration".to_string()],
            suitable_for: vec!["storyteller".to_string(), "mentor".to_string()],
        },
        VoiceSeed {
            name: "SunnyMentor".to_string(),
            category: "Mentor".to_string(),
            gender: Gender::Female,
            age: AgeBand::Adult,
            tone: "warm".to_string(),
            energy: "bright".to_string(),
            accent: "american".to_string(),
            reference_audio: Some("seeds/sunny_mentor.wav".to_string()),
            description: "Encouraging coach with an easy laugh.".to_string(),
            tags: vec!["friendly".to_string()],
            suitable_for: vec!["mentor".to_string(), "tutor".to_string()],
        },
        VoiceSeed {
            name: "VelvetVillain".to_string(),
            category: "Villain".to_string(),
            gender: Gender::Male,
            age: AgeBand::Mature,
            tone: "smooth".to_string(),
            energy: "low".to_string(),
            accent: "received-pronunciation".to_string(),
            reference_audio: Some("seeds/velvet_villain.wav".to_string()),
            description: "Urbane menace, never raises his voice.".to_string(),
            tags: vec!["villain".to_string()],
            suitable_for: vec!["antagonist".to_string(), "mastermind".to_string()],
        },
        VoiceSeed {
            name: "SparkCompanion".to_string(),
            category: "Companion".to_string(),
            gender: Gender::Female,
            age: AgeBand::Youthful,
            tone: "bright".to_string(),
            energy: "animated".to_string(),
            accent: "american".to_string(),
            reference_audio: None,
            description: "Upbeat sidekick energy.".to_string(),
            tags: vec!["cheerful".to_string()],
            suitable_for: vec!["companion".to_string(), "sidekick".to_string()],
        },
        VoiceSeed {
            name: "IronSergeant".to_string(),
            category: "Drill Sergeant".to_string(),
            gender: Gender::Male,
            age: AgeBand::Adult,
            tone: "barking".to_string(),
            energy: "high".to_string(),
            accent: "american".to_string(),
            reference_audio: None,
            description: "Loud, clipped, no patience for excuses.".to_string(),
            tags: vec!["intense".to_string()],
            suitable_for: vec!["coach".to_string(), "commander".to_string()],
        },
        VoiceSeed {
            name: "QuietLibrarian".to_string(),
            category: "Female ASMR".to_string(),
            gender: Gender::Female,
            age: AgeBand::Adult,
            tone: "soft".to_string(),
            energy: "low".to_string(),
            accent: "irish".to_string(),
            reference_audio: Some("seeds/quiet_librarian.wav".to_string()),
            description: "Gentle page-turning calm.".to_string(),
            tags: vec!["asmr".to_string(), "soothing".to_string()],
            suitable_for: vec!["companion".to_string(), "study-aid".to_string()],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_catalog_has_unique_names() {
        let catalog = VoiceCatalog::with_default_seeds();
        assert!(!catalog.is_empty());
        assert!(catalog.get("FemmeFatale").is_some());
        assert_eq!(
            catalog.get("FemmeFatale").unwrap().category,
            "Villain"
        );
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut catalog = VoiceCatalog::with_default_seeds();
        let dup = catalog.get("FemmeFatale").unwrap().clone();
        let result = catalog.insert(dup);
        assert!(matches!(result, Err(VoiceError::InvalidRequest(_))));
    }

    #[test]
    fn test_resolve_seed_id_takes_precedence_over_legacy_name() {
        let catalog = VoiceCatalog::with_default_seeds();
        let voice_ref = VoiceRef {
            seed_id: Some("GravelNarrator".to_string()),
            legacy_name: Some("SunnyMentor".to_string()),
            strict: true,
        };
        assert_eq!(catalog.resolve(&voice_ref).unwrap().name, "GravelNarrator");
    }

    #[test]
    fn test_resolve_legacy_name_case_insensitive() {
        let catalog = VoiceCatalog::with_default_seeds();
        let voice_ref = VoiceRef::legacy("femmefatale");
        assert_eq!(catalog.resolve(&voice_ref).unwrap().name, "FemmeFatale");
    }

    #[test]
    fn test_strict_unknown_seed_hard_fails() {
        let catalog = VoiceCatalog::with_default_seeds();
        let voice_ref = VoiceRef::seed("random_drift_voice_01");
        assert!(matches!(
            catalog.resolve(&voice_ref),
            Err(VoiceError::VoiceNotFound(_))
        ));
    }

    #[test]
    fn test_lenient_unknown_binding_gets_default_seed_only_when_designated() {
        let mut catalog = VoiceCatalog::with_default_seeds();

        let voice_ref = VoiceRef::legacy("some forgotten voice").lenient();
        // No default designated: still an error
        assert!(catalog.resolve(&voice_ref).is_err());

        catalog.set_default_seed("SunnyMentor").unwrap();
        assert_eq!(catalog.resolve(&voice_ref).unwrap().name, "SunnyMentor");
    }

    #[test]
    fn test_set_default_seed_must_exist() {
        let mut catalog = VoiceCatalog::with_default_seeds();
        assert!(catalog.set_default_seed("NotASeed").is_err());
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
default_seed: Custom
seeds:
  - name: Custom
    category: Narrator
    gender: female
    tone: crisp
  - name: Other
    category: Companion
"#
        )
        .unwrap();

        let catalog = VoiceCatalog::from_yaml_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog
                .resolve(&VoiceRef::legacy("nobody").lenient())
                .unwrap()
                .name,
            "Custom"
        );
    }

    #[test]
    fn test_from_yaml_file_rejects_duplicates() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
seeds:
  - name: Twin
    category: Narrator
  - name: Twin
    category: Villain
"#
        )
        .unwrap();

        assert!(VoiceCatalog::from_yaml_file(file.path()).is_err());
    }
}
