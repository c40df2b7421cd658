use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::COULD_NOT_VALIDATE;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated subject in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSubject {
    pub subject: String,
}

/// Guard for protected routes.
///
/// Resolves the bearer token into a subject and adds it to the request
/// extensions, or answers 401 with a `WWW-Authenticate: Bearer` challenge.
/// Missing, malformed, forged and expired tokens all get the same response.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req).ok_or_else(|| {
        tracing::debug!("Missing or malformed Authorization header");
        unauthorized()
    })?;

    let subject = state.account_service.current_subject(token).map_err(|e| {
        tracing::debug!(error = %e, "Bearer token rejected");
        unauthorized()
    })?;

    req.extensions_mut().insert(AuthenticatedSubject { subject });

    Ok(next.run(req).await)
}

fn unauthorized() -> Response {
    ApiError::Unauthorized(COULD_NOT_VALIDATE.to_string()).into_response()
}

fn extract_token_from_header(req: &Request) -> Option<&str> {
    let auth_str = req
        .headers()
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;

    let (scheme, token) = auth_str.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
