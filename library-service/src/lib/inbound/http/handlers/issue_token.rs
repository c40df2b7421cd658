use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// OAuth2 password-grant style login.
pub async fn issue_token(
    State(state): State<AppState>,
    Form(form): Form<TokenRequestForm>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    state
        .account_service
        .login(&form.username, &form.password)
        .await
        .map_err(ApiError::from)
        .map(|issued| {
            ApiSuccess::new(
                StatusCode::OK,
                TokenResponseData {
                    access_token: issued.access_token,
                    token_type: "bearer".to_string(),
                },
            )
        })
}

/// Form body of `POST /auth/token`. Extra OAuth2 fields (grant_type, scope)
/// are accepted and ignored.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct TokenRequestForm {
    #[serde(alias = "subject")]
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub access_token: String,
    pub token_type: String,
}
