use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
    jar: CookieJar,
) -> (CookieJar, ApiSuccess<LogoutResponseData>) {
    tracing::info!(user_id = %identity.user_id, "User logged out");

    (
        state.cookies.clear(jar),
        ApiSuccess::new(StatusCode::OK, LogoutResponseData {}).with_message("Logout successful"),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {}
