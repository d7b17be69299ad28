use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use super::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub const CSRF_HEADER: &str = "x-csrf-token";

#[derive(Deserialize)]
struct CsrfField {
    #[serde(rename = "_csrf")]
    csrf: Option<String>,
}

fn is_mutating(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}

/// Rejects mutating requests whose CSRF token (`x-csrf-token` header or
/// `_csrf` body field) differs from the one bound to the access token.
pub async fn csrf_middleware(
    State(state): State<AppState>,
    user: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !is_mutating(request.method()) {
        return Ok(next.run(request).await);
    }

    let header_token = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let (request, token) = match header_token {
        Some(token) => (request, Some(token)),
        None => {
            let (parts, body) = request.into_parts();
            let bytes = to_bytes(body, state.config.api.max_request_size_bytes)
                .await
                .map_err(|_| ApiError::payload_too_large("Request body too large"))?;
            let token = serde_json::from_slice::<CsrfField>(&bytes).ok().and_then(|f| f.csrf);
            (Request::from_parts(parts, Body::from(bytes)), token)
        }
    };

    match token {
        Some(token) if token == user.csrf => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!(user = %user.username, "CSRF token mismatch");
            Err(ApiError::forbidden("Invalid CSRF token"))
        }
        None => Err(ApiError::forbidden("Missing CSRF token")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_writes_are_guarded() {
        assert!(is_mutating(&Method::POST));
        assert!(is_mutating(&Method::DELETE));
        assert!(!is_mutating(&Method::GET));
        assert!(!is_mutating(&Method::OPTIONS));
    }

    #[test]
    fn reads_csrf_from_body() {
        let field: CsrfField = serde_json::from_str(r#"{"name":"x","_csrf":"abc"}"#).unwrap();
        assert_eq!(field.csrf.as_deref(), Some("abc"));
    }
}
