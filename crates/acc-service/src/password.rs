//! Password hashing and verification using Argon2id.
//!
//! Passwords arrive in plaintext on create and update and are stored as PHC
//! strings. They are never returned to callers.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{ServiceError, ServiceResult};

/// Password hashing configuration.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Time cost (iterations).
    pub time_cost: u32,
    /// Parallelism factor.
    pub parallelism: u32,
    /// Output hash length.
    pub hash_length: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            memory_cost: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
            hash_length: 32,
        }
    }
}

impl PasswordPolicy {
    /// Creates a new password policy with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cheap settings for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self::default().memory_cost(1024).time_cost(1)
    }

    /// Sets the memory cost in KiB.
    #[must_use]
    pub const fn memory_cost(mut self, kib: u32) -> Self {
        self.memory_cost = kib;
        self
    }

    /// Sets the time cost (iterations).
    #[must_use]
    pub const fn time_cost(mut self, iterations: u32) -> Self {
        self.time_cost = iterations;
        self
    }

    fn build_params(&self) -> Result<Params, argon2::Error> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(self.hash_length as usize),
        )
    }
}

/// Password hasher using Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasherService {
    policy: PasswordPolicy,
}

impl PasswordHasherService {
    /// Creates a new password hasher with the given policy.
    #[must_use]
    pub const fn new(policy: PasswordPolicy) -> Self {
        Self { policy }
    }

    /// Hashes a password, returning the PHC string.
    ///
    /// ## Errors
    ///
    /// Returns `ServiceError::Internal` if the policy is invalid or hashing
    /// fails.
    pub fn hash(&self, password: &str) -> ServiceResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let params = self
            .policy
            .build_params()
            .map_err(|e| ServiceError::Internal(format!("invalid password policy: {e}")))?;

        let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a password against a stored hash.
    ///
    /// A stored value that is not a PHC string never verifies.
    ///
    /// ## Errors
    ///
    /// Returns `ServiceError::InvalidCredentials` if verification fails.
    pub fn verify(&self, password: &str, hash: &str) -> ServiceResult<()> {
        let parsed = PasswordHash::new(hash).map_err(|_| ServiceError::InvalidCredentials)?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| ServiceError::InvalidCredentials)
    }
}

impl Default for PasswordHasherService {
    fn default() -> Self {
        Self::new(PasswordPolicy::default())
    }
}
