pub mod auth;

pub use auth::{UserContext, api_auth_middleware};
