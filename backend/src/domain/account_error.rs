//! Failures raised by the account use-cases and their transport mapping.

use serde_json::json;

use super::ports::{AccountPersistenceError, PasswordHashError, SessionStoreError};
use super::{AccountId, Error};

/// Distinct failure conditions of the account service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    /// No account is registered under the login email.
    #[error("no account is registered for this email")]
    EmailNotFound,
    /// The supplied password does not match the stored hash.
    #[error("password does not match")]
    PasswordMismatch,
    /// Update/delete target is missing or soft-deleted.
    #[error("account {id} not found")]
    AccountNotFound {
        /// Requested identifier.
        id: AccountId,
    },
    /// Credential lookup found no account with this username.
    #[error("no account is registered for username {username}")]
    UsernameNotFound {
        /// Requested username.
        username: String,
    },
    /// The credential subject is disabled.
    #[error("account is disabled")]
    Disabled,
    /// The account store failed.
    #[error(transparent)]
    Persistence(#[from] AccountPersistenceError),
    /// The password could not be hashed.
    #[error(transparent)]
    Hashing(#[from] PasswordHashError),
    /// The session could not be written.
    #[error(transparent)]
    Session(#[from] SessionStoreError),
}

impl AccountError {
    /// Stable snake_case identifier carried in `details.code`.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmailNotFound => "email_not_found",
            Self::PasswordMismatch => "password_mismatch",
            Self::AccountNotFound { .. } => "account_not_found",
            Self::UsernameNotFound { .. } => "username_not_found",
            Self::Disabled => "account_disabled",
            Self::Persistence(AccountPersistenceError::Duplicate { .. }) => "duplicate_account",
            Self::Persistence(AccountPersistenceError::Connection { .. }) => {
                "account_store_unavailable"
            }
            Self::Persistence(AccountPersistenceError::Query { .. }) => "account_store_error",
            Self::Hashing(_) => "password_hashing_failed",
            Self::Session(_) => "session_write_failed",
        }
    }
}

impl From<AccountError> for Error {
    fn from(err: AccountError) -> Self {
        let code = err.code();
        let mapped = match &err {
            AccountError::EmailNotFound
            | AccountError::AccountNotFound { .. }
            | AccountError::UsernameNotFound { .. } => Self::not_found(err.to_string()),
            AccountError::PasswordMismatch | AccountError::Disabled => {
                Self::unauthorized(err.to_string())
            }
            AccountError::Persistence(AccountPersistenceError::Duplicate { constraint }) => {
                return Self::conflict("an account with this email or username already exists")
                    .with_details(json!({ "code": code, "constraint": constraint }));
            }
            AccountError::Persistence(AccountPersistenceError::Connection { .. }) => {
                Self::service_unavailable("account store unavailable")
            }
            AccountError::Persistence(AccountPersistenceError::Query { .. })
            | AccountError::Hashing(_)
            | AccountError::Session(_) => Self::internal(err.to_string()),
        };
        mapped.with_details(json!({ "code": code }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn id() -> AccountId {
        AccountId::new(4).expect("id")
    }

    #[rstest]
    #[case(AccountError::EmailNotFound, ErrorCode::NotFound, "email_not_found")]
    #[case(AccountError::PasswordMismatch, ErrorCode::Unauthorized, "password_mismatch")]
    #[case(AccountError::AccountNotFound { id: id() }, ErrorCode::NotFound, "account_not_found")]
    #[case(
        AccountError::UsernameNotFound { username: "bob".into() },
        ErrorCode::NotFound,
        "username_not_found"
    )]
    #[case(AccountError::Disabled, ErrorCode::Unauthorized, "account_disabled")]
    #[case(
        AccountPersistenceError::connection("refused").into(),
        ErrorCode::ServiceUnavailable,
        "account_store_unavailable"
    )]
    #[case(
        AccountPersistenceError::query("syntax").into(),
        ErrorCode::InternalError,
        "account_store_error"
    )]
    #[case(
        PasswordHashError::encode("params").into(),
        ErrorCode::InternalError,
        "password_hashing_failed"
    )]
    #[case(
        SessionStoreError::write("full").into(),
        ErrorCode::InternalError,
        "session_write_failed"
    )]
    fn maps_to_transport_error(
        #[case] err: AccountError,
        #[case] expected: ErrorCode,
        #[case] detail: &str,
    ) {
        let mapped = Error::from(err);
        assert_eq!(mapped.code(), expected);
        assert_eq!(mapped.details(), Some(&json!({ "code": detail })));
    }

    #[rstest]
    fn duplicate_reports_constraint() {
        let mapped = Error::from(AccountError::from(AccountPersistenceError::duplicate(
            "accounts_email_live_key",
        )));
        assert_eq!(mapped.code(), ErrorCode::Conflict);
        assert_eq!(
            mapped.details(),
            Some(&json!({ "code": "duplicate_account", "constraint": "accounts_email_live_key" }))
        );
    }
}
