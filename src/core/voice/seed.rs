//! Voice seed types.
//!
//! A voice seed is a named acoustic profile describing how a character is
//! meant to sound, independent of which engine ultimately renders it.

use serde::{Deserialize, Serialize};

/// Perceived gender of a seed's voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    #[default]
    Neutral,
}

impl Gender {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
            Self::Neutral => "neutral",
        }
    }
}

/// Coarse age band of a seed's voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    Youthful,
    #[default]
    Adult,
    Mature,
}

impl AgeBand {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Youthful => "youthful",
            Self::Adult => "adult",
            Self::Mature => "mature",
        }
    }
}

/// A named acoustic profile from the voice catalog.
///
/// Names are unique within a catalog. A seed may or may not carry
/// synthesizable reference audio; cloning engines (F5, OpenVoice) can
/// only serve seeds that do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSeed {
    pub name: String,
    /// Product-facing grouping, e.g. "Male ASMR" or "Villain"
    pub category: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub age: AgeBand,
    /// Free-text tonal quality, e.g. "sultry", "gravelly"
    #[serde(default)]
    pub tone: String,
    /// Free-text energy level, e.g. "low", "animated"
    #[serde(default)]
    pub energy: String,
    #[serde(default)]
    pub accent: String,
    /// Path to reference audio for cloning engines, when available
    #[serde(default)]
    pub reference_audio: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Character archetypes this seed suits, e.g. "mentor", "antagonist"
    #[serde(default)]
    pub suitable_for: Vec<String>,
}

/// A character's stored voice binding, as the chat/call features hand it
/// to the pipeline.
///
/// Resolution order: `seed_id` takes precedence over `legacy_name`.
/// `strict` characters must hard-fail on an unresolvable binding rather
/// than receive a default voice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceRef {
    #[serde(default)]
    pub seed_id: Option<String>,
    /// Free-text voice name on older character records
    #[serde(default)]
    pub legacy_name: Option<String>,
    #[serde(default = "default_strict")]
    pub strict: bool,
}

fn default_strict() -> bool {
    true
}

impl VoiceRef {
    pub fn seed(id: impl Into<String>) -> Self {
        Self {
            seed_id: Some(id.into()),
            legacy_name: None,
            strict: true,
        }
    }

    pub fn legacy(name: impl Into<String>) -> Self {
        Self {
            seed_id: None,
            legacy_name: Some(name.into()),
            strict: true,
        }
    }

    pub fn lenient(mut self) -> Self {
        self.strict = false;
        self
    }
}
