// Password hashing utilities
// Uses bcrypt for salted, adaptive-cost password hashing

use bcrypt::{hash, verify, BcryptError};
use thiserror::Error;

/// Cost used when none is configured
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Failure to produce a hash
///
/// Only raised on internal errors such as an out-of-range cost; it is never
/// swallowed into a default value.
#[derive(Debug, Error)]
#[error("failed to hash credential: {0}")]
pub struct HashError(String);

impl HashError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<BcryptError> for HashError {
    fn from(err: BcryptError) -> Self {
        Self(err.to_string())
    }
}

/// One-way credential hashing
///
/// Implementations must be randomised (salted) so hashing the same plaintext
/// twice yields different values, and `verify` must answer `false` for a wrong
/// plaintext or a malformed hash instead of failing.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Hashes a plaintext credential
    fn hash(&self, plaintext: &str) -> Result<String, HashError>;

    /// Checks a plaintext credential against a stored hash
    fn verify(&self, hashed: &str, plaintext: &str) -> bool;
}

/// bcrypt-backed [`CredentialHasher`]
///
/// # Example
/// ```
/// use saver_api::security::password::{BcryptHasher, CredentialHasher};
///
/// let hasher = BcryptHasher::with_cost(4);
/// let hash = hasher.hash("my_password").expect("valid hash");
/// assert!(hasher.verify(&hash, "my_password"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Creates a hasher with the default cost
    pub fn new() -> Self {
        Self::with_cost(DEFAULT_BCRYPT_COST)
    }

    /// Creates a hasher with an explicit cost factor
    ///
    /// The cost is checked when hashing, so an invalid value surfaces as a
    /// [`HashError`] on the first call.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        Ok(hash(plaintext, self.cost)?)
    }

    fn verify(&self, hashed: &str, plaintext: &str) -> bool {
        verify(plaintext, hashed).unwrap_or(false)
    }
}
