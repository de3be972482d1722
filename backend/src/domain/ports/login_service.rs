//! Driving port for interactive login.
//!
//! The session is passed in explicitly; a successful login writes the
//! account snapshot into it and nothing else touches it.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, LoginCredentials};

use super::SessionStore;

/// Domain use-case port for authentication.
///
/// Futures are not `Send` because session handles are bound to the request
/// thread.
#[async_trait(?Send)]
pub trait LoginService: Send + Sync {
    /// Verify credentials, record the account in `session` and return its id.
    async fn login(
        &self,
        credentials: &LoginCredentials,
        session: &dyn SessionStore,
    ) -> Result<AccountId, Error>;
}
