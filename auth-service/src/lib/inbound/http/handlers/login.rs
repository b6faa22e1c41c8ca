use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use super::start_session;
use super::ApiError;
use super::ApiSuccess;
use super::FieldError;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiSuccess<LoginResponseData>), ApiError> {
    let Json(body) = body?;
    let command = body.validate().map_err(ApiError::ValidationFailed)?;

    let user = state.auth_service.login(command).await.map_err(|e| {
        tracing::warn!(error = %e, "Login rejected");
        ApiError::from(e)
    })?;
    let jar = start_session(&state, jar, &user)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            LoginResponseData {
                user: (&user).into(),
            },
        )
        .with_message("Login successful"),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<LoginCommand, Vec<FieldError>> {
        let mut errors = Vec::new();

        let email = EmailAddress::new(self.email)
            .map_err(|_| errors.push(FieldError::new("email", "Invalid email address")))
            .ok();

        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }

        match email {
            Some(email) if errors.is_empty() => Ok(LoginCommand {
                email,
                password: self.password,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: UserData,
}
