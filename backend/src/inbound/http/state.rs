//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::AccountService;
use crate::domain::ports::{AccountRepository, AccountsCommand, AccountsQuery, LoginService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account listings.
    pub accounts: Arc<dyn AccountsQuery>,
    /// Account lifecycle mutations.
    pub commands: Arc<dyn AccountsCommand>,
    /// Interactive login.
    pub login: Arc<dyn LoginService>,
}

impl HttpState {
    /// Route every port to one shared account service.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use account_backend::domain::AccountService;
    /// use account_backend::inbound::http::state::HttpState;
    /// use account_backend::outbound::memory::InMemoryAccountRepository;
    /// use account_backend::outbound::password::Argon2PasswordHasher;
    ///
    /// let service = AccountService::new(
    ///     Arc::new(InMemoryAccountRepository::new()),
    ///     Arc::new(Argon2PasswordHasher::new()),
    /// );
    /// let state = HttpState::from_service(Arc::new(service));
    /// let _login = state.login.clone();
    /// ```
    pub fn from_service<R>(service: Arc<AccountService<R>>) -> Self
    where
        R: AccountRepository + ?Sized + 'static,
    {
        Self {
            accounts: service.clone(),
            commands: service.clone(),
            login: service,
        }
    }
}
