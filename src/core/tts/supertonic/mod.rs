//! Supertonic TTS provider.
//!
//! Local low-latency engine with a small fixed bank of preset voices;
//! only the catalog seeds with an explicit Supertonic preset mapping can
//! be served by it. No credential, authenticated by network placement.

mod provider;

pub use provider::SupertonicTts;
