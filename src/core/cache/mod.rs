//! Content-addressed cache of synthesized audio.
//!
//! Identical requests reuse work: the key is a digest over the
//! normalized text and every synthesis-relevant parameter, so two
//! requests collide only when the audible output would be identical.

mod key;
mod store;

pub use key::cache_key;
pub use store::{AudioCache, CacheEntry, CacheStats};
