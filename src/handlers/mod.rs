pub mod api;
pub mod speak;
pub mod voices;

pub use api::{cache_stats, health_check, provider_health};
pub use speak::speak_handler;
pub use voices::{get_voice, list_voices};
