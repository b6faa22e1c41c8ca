use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

pub async fn me(Extension(identity): Extension<AuthenticatedUser>) -> ApiSuccess<MeResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        MeResponseData {
            user: (&identity).into(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub user: CurrentUserData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&AuthenticatedUser> for CurrentUserData {
    fn from(identity: &AuthenticatedUser) -> Self {
        Self {
            id: identity.user_id.to_string(),
            name: identity.name.clone(),
            email: identity.email.as_str().to_string(),
            role: identity.role.as_str().to_string(),
        }
    }
}
