//! Port for account persistence and its error taxonomy.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, Email, NewAccount, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Duplicate { constraint: String } =>
            "account violates unique constraint {constraint}",
    }
}

/// Durable collection of accounts keyed by id, email and username.
///
/// Lookups return deleted accounts too; filtering is the caller's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Every stored account, ordered by identifier.
    async fn find_all(&self) -> Result<Vec<Account>, AccountPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountPersistenceError>;

    /// Fetch an account by email address.
    ///
    /// When a deleted and a live account share an address the live one wins.
    async fn find_by_email(&self, email: &Email)
    -> Result<Option<Account>, AccountPersistenceError>;

    /// Fetch an account by username, preferring a live account.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountPersistenceError>;

    /// Persist a new account and return it with its assigned identifier.
    async fn insert(&self, account: NewAccount) -> Result<Account, AccountPersistenceError>;

    /// Overwrite an existing account.
    async fn update(&self, account: Account) -> Result<Account, AccountPersistenceError>;
}
