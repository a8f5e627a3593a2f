//! Port for one-way password hashing.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing or verification could not run.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Hashes and verifies account passwords.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash suitable for storage.
    async fn hash(&self, password: &str) -> Result<String, PasswordHasherError>;

    /// Check `password` against a stored hash.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError>;
}
