//! Voice catalog, provider mapping and routing policy.

mod catalog;
mod mapping;
mod router;
mod seed;

pub use catalog::VoiceCatalog;
pub use mapping::ProviderVoiceMap;
pub use router::{RouterDecision, VoiceRouter};
pub use seed::{AgeBand, Gender, VoiceRef, VoiceSeed};
