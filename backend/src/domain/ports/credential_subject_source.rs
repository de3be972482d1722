//! Driving port used by authentication frameworks to verify credentials by
//! username.

use async_trait::async_trait;

use crate::domain::{AccountId, CredentialSubject, Error};

/// Lookup and verification of credential subjects by username.
#[async_trait]
pub trait CredentialSubjectSource: Send + Sync {
    /// Load the credential-bearing view of the account named `username`.
    async fn load_subject(&self, username: &str) -> Result<Box<dyn CredentialSubject>, Error>;

    /// Verify `password` for an enabled subject and return its account id.
    async fn authenticate_subject(&self, username: &str, password: &str)
    -> Result<AccountId, Error>;
}
