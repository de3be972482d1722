//! Driving port for account listings.

use async_trait::async_trait;

use crate::domain::{Email, Error, Nickname};

/// Publicly listed view of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    /// Email address.
    pub email: Email,
    /// Display nickname.
    pub nickname: Nickname,
}

/// Domain use-case port for listing accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsQuery: Send + Sync {
    /// Every visible account, ordered by identifier.
    async fn list_accounts(&self) -> Result<Vec<AccountSummary>, Error>;
}
