//! Driving port for account lifecycle mutations.
//!
//! Inbound adapters validate payloads into domain types first, so every
//! method here receives already-checked values.

use async_trait::async_trait;

use crate::domain::{AccountId, CreateAccountRequest, Error, ProfileReplacement};

/// Domain use-case port for creating, updating and soft-deleting accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Create an account and return its new identifier.
    async fn create_account(&self, request: CreateAccountRequest) -> Result<AccountId, Error>;

    /// Overwrite every profile field of an active account.
    async fn update_account(
        &self,
        id: AccountId,
        replacement: ProfileReplacement,
    ) -> Result<(), Error>;

    /// Soft-delete an active account.
    async fn delete_account(&self, id: AccountId) -> Result<(), Error>;
}
