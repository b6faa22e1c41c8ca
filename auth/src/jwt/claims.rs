use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session token claims.
///
/// Carries the subject, its role and the standard RFC 7519 issued-at and
/// expiration timestamps. Immutable once signed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Role granted to the subject
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user session expiring `ttl` from now.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `role` - Role name of the user
    /// * `ttl` - Token lifetime
    ///
    /// # Returns
    /// Claims with sub, role, iat and exp set
    pub fn for_user(user_id: impl ToString, role: impl ToString, ttl: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + ttl;

        Self {
            sub: user_id.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = iat;
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }
}
