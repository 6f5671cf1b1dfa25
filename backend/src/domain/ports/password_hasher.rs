//! Port for slow, salted one-way password hashing.
//!
//! Both operations are CPU-bound. Adapters must run them off the async
//! executor so one hash cannot stall unrelated requests.

use async_trait::async_trait;

use crate::domain::{Error, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Producing a new hash failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be checked (malformed or worker failure).
        Verify { message: String } => "password verification failed: {message}",
    }
}

impl From<PasswordHashError> for Error {
    fn from(error: PasswordHashError) -> Self {
        Self::internal(error.to_string())
    }
}

/// Hash and verify passwords.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh random salt embedded in the output.
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Check `password` against `hash`. A mismatch is `Ok(false)`, not an error.
    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}
