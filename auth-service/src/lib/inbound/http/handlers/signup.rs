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
use crate::domain::user::models::Role;
use crate::domain::user::models::SignupCommand;
use crate::inbound::http::router::AppState;

const MIN_PASSWORD_LENGTH: usize = 8;

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiSuccess<SignupResponseData>), ApiError> {
    let Json(body) = body?;
    let command = body.validate().map_err(ApiError::ValidationFailed)?;

    let user = state.auth_service.signup(command).await?;
    let jar = start_session(&state, jar, &user)?;

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::CREATED,
            SignupResponseData {
                user: (&user).into(),
            },
        )
        .with_message("User created successfully"),
    ))
}

/// HTTP request body for signing up (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    role: String,
}

impl SignupRequest {
    /// Check every field, reporting all violations at once.
    pub fn validate(self) -> Result<SignupCommand, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }

        let email = EmailAddress::new(self.email)
            .map_err(|_| errors.push(FieldError::new("email", "Invalid email address")))
            .ok();

        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 8 characters long",
            ));
        }

        let role = self
            .role
            .parse::<Role>()
            .map_err(|_| errors.push(FieldError::new("role", "Role must be USER or ADMIN")))
            .ok();

        match (email, role) {
            (Some(email), Some(role)) if errors.is_empty() => Ok(SignupCommand {
                name: self.name,
                email,
                password: self.password,
                role,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupResponseData {
    pub user: UserData,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str, role: &str) -> SignupRequest {
        SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        let command = request("Ann", "ann@x.com", "longenough1", "USER")
            .validate()
            .expect("Request should be valid");

        assert_eq!(command.name, "Ann");
        assert_eq!(command.email.as_str(), "ann@x.com");
        assert_eq!(command.role, Role::User);
    }

    #[test]
    fn test_reports_every_invalid_field() {
        let errors = request("", "not-an-email", "short", "ROOT")
            .validate()
            .unwrap_err();

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "password", "role"]);
    }

    #[test]
    fn test_password_length_boundary() {
        assert!(request("Ann", "ann@x.com", "1234567", "ADMIN")
            .validate()
            .is_err());
        assert!(request("Ann", "ann@x.com", "12345678", "ADMIN")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_only_empty_name_rejected() {
        assert!(request("", "ann@x.com", "longenough1", "USER")
            .validate()
            .is_err());

        let command = request("  ", "ann@x.com", "longenough1", "USER")
            .validate()
            .expect("Whitespace name should be accepted");
        assert_eq!(command.name, "  ");
    }
}
