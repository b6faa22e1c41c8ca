use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Provides salted, one-way password hashing (internally uses Argon2id).
/// The work factor is configurable; stored hashes carry their own parameters,
/// so retuning never invalidates hashes produced under earlier settings.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a new password hasher with the default Argon2id work factor.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Create a password hasher with a custom work factor.
    ///
    /// # Arguments
    /// * `memory_cost_kib` - Memory size in KiB
    /// * `time_cost` - Number of iterations
    /// * `parallelism` - Degree of parallelism
    ///
    /// # Errors
    /// * `InvalidParameters` - Parameters are outside the ranges Argon2 accepts
    pub fn with_params(
        memory_cost_kib: u32,
        time_cost: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_cost_kib, time_cost, parallelism, None)
            .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;
        Ok(Self { params })
    }

    /// Hash a plaintext password securely.
    ///
    /// A fresh random salt is generated per call, so hashing the same input twice
    /// yields different outputs.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Verification uses the parameters embedded in the stored hash and compares
    /// digests in constant time. A hash that cannot be parsed counts as a mismatch.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
