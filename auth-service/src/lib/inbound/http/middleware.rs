use axum::body::Body;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum_extra::extract::CookieJar;
use thiserror::Error;

use super::handlers::ApiError;
use super::handlers::ApiErrorBody;
use super::handlers::ErrorDetail;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Single reply for every rejected session.
pub const AUTHENTICATION_REQUIRED: &str = "Authentication required. Please log in.";

/// Identity resolved for a protected request.
///
/// Built from verified token claims plus freshly loaded user fields, stored in
/// the request extensions for the duration of one request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: Role,
    pub name: String,
    pub email: EmailAddress,
    pub issued_at: i64,
    pub expires_at: i64,
}

#[derive(Debug, Error)]
enum SessionError {
    #[error("no session cookie")]
    MissingToken,

    #[error("token rejected: {0}")]
    InvalidToken(#[from] auth::JwtError),

    #[error("token claims rejected: {0}")]
    InvalidClaims(String),

    #[error("token subject no longer exists")]
    UnknownSubject,

    #[error("identity lookup failed: {0}")]
    Lookup(UserError),
}

impl SessionError {
    fn step(&self) -> &'static str {
        match self {
            SessionError::MissingToken => "extract_token",
            SessionError::InvalidToken(_) | SessionError::InvalidClaims(_) => "verify_token",
            SessionError::UnknownSubject | SessionError::Lookup(_) => "resolve_identity",
        }
    }
}

/// Middleware that validates the session cookie and adds the identity to request extensions
///
/// Any rejection clears the session cookie and answers 401 with the same message,
/// whichever step failed, including a failed directory lookup.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    match resolve_identity(&state, &jar).await {
        Ok(identity) => {
            tracing::debug!(user_id = %identity.user_id, "Session accepted");
            req.extensions_mut().insert(identity);
            Ok(next.run(req).await)
        }
        Err(err) => {
            if let SessionError::Lookup(_) = err {
                tracing::error!(step = err.step(), reason = %err, "Session lookup failed");
            } else {
                tracing::warn!(step = err.step(), reason = %err, "Session rejected");
            }
            Err((
                state.cookies.clear(jar),
                ApiError::Unauthorized(AUTHENTICATION_REQUIRED.to_string()),
            )
                .into_response())
        }
    }
}

async fn resolve_identity(
    state: &AppState,
    jar: &CookieJar,
) -> Result<AuthenticatedUser, SessionError> {
    let token = state.cookies.token(jar).ok_or(SessionError::MissingToken)?;

    let claims = state.jwt_handler.verify(token)?;
    let user_id = UserId::from_string(&claims.sub)
        .map_err(|e| SessionError::InvalidClaims(e.to_string()))?;
    let role = claims
        .role
        .parse::<Role>()
        .map_err(|e| SessionError::InvalidClaims(e.to_string()))?;

    let user = state
        .auth_service
        .find_by_id(&user_id)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => SessionError::UnknownSubject,
            other => SessionError::Lookup(other),
        })?;

    Ok(AuthenticatedUser {
        user_id: user.id,
        role,
        name: user.name,
        email: user.email,
        issued_at: claims.iat,
        expires_at: claims.exp,
    })
}

/// Render internal error details into the response body.
///
/// Installed outside production only.
pub async fn expose_error_detail(req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let Some(detail) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);

    match serde_json::to_vec(&ApiErrorBody::with_detail(detail)) {
        Ok(body) => Response::from_parts(parts, Body::from(body)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render error detail");
            Response::from_parts(parts, Body::empty())
        }
    }
}
