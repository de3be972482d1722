//! Port for one-way password encoding.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised while encoding a password.
    pub enum PasswordHashError {
        /// The hashing primitive rejected the input or its parameters.
        Encode { message: String } => "password hashing failed: {message}",
    }
}

/// One-way credential transform with a verify operation.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `plaintext` with a fresh salt.
    fn encode(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Whether `plaintext` hashes to `hash`. Malformed hashes never match.
    fn matches(&self, plaintext: &str, hash: &PasswordHash) -> bool;
}
