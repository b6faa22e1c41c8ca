//! Authentication primitives library
//!
//! Provides the security-sensitive building blocks for session-based authentication:
//! - Password hashing (Argon2id)
//! - Signed session tokens (JWT, HS256)
//! - Token lifetime parsing from duration strings (`"15m"`, `"1h"`, `"7d"`)
//!
//! Services compose these pieces with their own persistence and transport layers.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{parse_duration, Claims, JwtHandler};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let ttl = parse_duration("15m").unwrap();
//! let claims = Claims::for_user("user123", "USER", ttl);
//! let token = handler.sign(&claims).unwrap();
//! let decoded = handler.verify(&token).unwrap();
//! assert_eq!(decoded, claims);
//! ```

pub mod duration;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use duration::parse_duration;
pub use duration::DurationError;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
