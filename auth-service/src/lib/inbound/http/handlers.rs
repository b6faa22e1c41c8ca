use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use crate::domain::user::models::SanitizedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub mod health;
pub mod login;
pub mod logout;
pub mod me;
pub mod signup;

/// Reply sent for every internal error when details are hidden.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(data)))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.1 .0.message = Some(message.into());
        self
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Transport-facing failure kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(ErrorDetail),
    ValidationFailed(Vec<FieldError>),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

/// Diagnostic detail of an internal error.
///
/// Attached to the response extensions; only rendered into the body
/// outside production by [`super::middleware::expose_error_detail`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub message: String,
    pub trace: String,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: trace.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<auth::JwtError> for ApiError {
    fn from(e: auth::JwtError) -> Self {
        Self::InternalServerError(ErrorDetail::new(e.to_string(), format!("{:?}", e)))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail.message, "Internal server error");
                let mut response = (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiErrorBody::new(INTERNAL_ERROR_MESSAGE)),
                )
                    .into_response();
                response.extensions_mut().insert(detail);
                return response;
            }
            ApiError::ValidationFailed(errors) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new("Validation error").with_errors(errors),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiErrorBody::new(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiErrorBody::new(msg)),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, ApiErrorBody::new(msg)),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ApiErrorBody::new(msg)),
        };

        (status, Json(body)).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::InvalidUserId(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidRole(_)
            | UserError::PasswordHashing(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => ApiError::InternalServerError(ErrorDetail::new(
                err.to_string(),
                format!("{:?}", err),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(flatten)]
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: Vec::new(),
            stack: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_detail(detail: ErrorDetail) -> Self {
        Self {
            success: false,
            message: detail.message,
            errors: Vec::new(),
            stack: Some(detail.trace),
        }
    }
}

/// Sanitized user as rendered on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<&SanitizedUser> for UserData {
    fn from(user: &SanitizedUser) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.as_str().to_string(),
            role: user.role.as_str().to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Sign a session token for `user` and store it in the cookie jar.
pub(crate) fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: &SanitizedUser,
) -> Result<CookieJar, ApiError> {
    let claims = auth::Claims::for_user(user.id, user.role.as_str(), state.token_ttl);
    let token = state.jwt_handler.sign(&claims)?;
    Ok(state.cookies.attach(jar, token))
}
