//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod accounts_command;
mod accounts_query;
mod credential_subject_source;
mod login_service;
mod password_hasher;
mod session_store;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountPersistenceError, AccountRepository};
#[cfg(test)]
pub use accounts_command::MockAccountsCommand;
pub use accounts_command::AccountsCommand;
#[cfg(test)]
pub use accounts_query::MockAccountsQuery;
pub use accounts_query::{AccountSummary, AccountsQuery};
pub use credential_subject_source::CredentialSubjectSource;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{SessionStore, SessionStoreError};
