//! bcrypt-backed [`PasswordHasher`].
//!
//! Hashing is CPU bound, so both operations run on the blocking pool.

use async_trait::async_trait;
use tokio::task;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Minimum cost accepted by bcrypt; only suitable for tests.
pub const MIN_COST: u32 = 4;

/// Password hasher using bcrypt with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl BcryptPasswordHasher {
    /// Use an explicit work factor.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

fn join_error(err: task::JoinError) -> PasswordHasherError {
    PasswordHasherError::hashing(format!("hashing task failed: {err}"))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHasherError> {
        let password = Zeroizing::new(password.to_owned());
        let cost = self.cost;
        task::spawn_blocking(move || bcrypt::hash(password.as_bytes(), cost))
            .await
            .map_err(join_error)?
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError> {
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.to_owned();
        task::spawn_blocking(move || bcrypt::verify(password.as_bytes(), &hash))
            .await
            .map_err(join_error)?
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))
    }
}
