use crate::errors::auth_error::AuthError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Caller identity attached to authenticated requests.
///
/// Handlers read this via `Extension<UserContext>`; it is always
/// present after the middleware runs, even when auth is disabled.
#[derive(Debug, Clone)]
pub struct UserContext {
    /// Id of the matched API secret, `None` when auth is disabled
    pub client_id: Option<String>,
    /// Caller-supplied `x-user-id` header, passed through for logging
    pub user_id: Option<String>,
}

impl UserContext {
    pub fn anonymous(user_id: Option<String>) -> Self {
        Self {
            client_id: None,
            user_id,
        }
    }

    pub fn authenticated(client_id: String, user_id: Option<String>) -> Self {
        Self {
            client_id: Some(client_id),
            user_id,
        }
    }
}

/// Extract the bearer token from the Authorization header.
fn extract_token(request: &Request) -> Result<String, AuthError> {
    let auth_header = request
        .headers()
        .get("authorization")
        .ok_or(AuthError::MissingAuthHeader)?;
    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;
    auth_str
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or(AuthError::InvalidAuthHeader)
}

fn user_id_header(request: &Request) -> Option<String> {
    request
        .headers()
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Bearer-token middleware over the configured API secrets.
///
/// When `auth_required` is off the request proceeds with an anonymous
/// [`UserContext`] so handlers keep a uniform view of the caller.
pub async fn api_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user_id = user_id_header(&request);

    if !state.config.auth_required {
        request
            .extensions_mut()
            .insert(UserContext::anonymous(user_id));
        return Ok(next.run(request).await);
    }

    if !state.config.has_api_secret_auth() {
        return Err(AuthError::ConfigError(
            "Authentication required but no API secrets configured".to_string(),
        ));
    }

    let token = extract_token(&request)?;
    match state.config.find_api_secret_id(&token).map(str::to_string) {
        Some(client_id) => {
            tracing::debug!(
                path = %request.uri().path(),
                client_id = %client_id,
                "API secret authentication successful"
            );
            request
                .extensions_mut()
                .insert(UserContext::authenticated(client_id, user_id));
            Ok(next.run(request).await)
        }
        None => {
            tracing::warn!(
                path = %request.uri().path(),
                "API secret authentication failed: token mismatch"
            );
            Err(AuthError::Unauthorized("Invalid API secret".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Method;

    fn request_with_header(name: &str, value: &str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/speak")
            .header(name, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_extract_token_from_bearer_header() {
        let request = request_with_header("authorization", "Bearer secret-token");
        assert_eq!(extract_token(&request).unwrap(), "secret-token");
    }

    #[test]
    fn test_extract_token_rejects_non_bearer_scheme() {
        let request = request_with_header("authorization", "Basic dXNlcjpwYXNz");
        assert!(matches!(
            extract_token(&request),
            Err(AuthError::InvalidAuthHeader)
        ));
    }

    #[test]
    fn test_extract_token_missing_header() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/speak")
            .body(Body::empty())
            .unwrap();
        assert!(matches!(
            extract_token(&request),
            Err(AuthError::MissingAuthHeader)
        ));
    }

    #[test]
    fn test_user_id_header_passthrough() {
        let request = request_with_header("x-user-id", "user-42");
        assert_eq!(user_id_header(&request).as_deref(), Some("user-42"));
    }
}
