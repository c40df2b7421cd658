use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedSubject;

/// Echo the subject resolved by the bearer guard.
pub async fn current_subject(
    Extension(authenticated): Extension<AuthenticatedSubject>,
) -> ApiSuccess<CurrentSubjectResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        CurrentSubjectResponseData {
            subject: authenticated.subject,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentSubjectResponseData {
    pub subject: String,
}
