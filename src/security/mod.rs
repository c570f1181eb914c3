// Credential hashing boundary

pub mod password;

pub use password::{BcryptHasher, CredentialHasher, HashError};
#[cfg(test)]
pub use password::MockCredentialHasher;
