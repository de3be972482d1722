//! Authentication primitives: login credentials and the session snapshot.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{Account, AccountId, AccountValidationError, Email, Nickname, Roles, Username};

/// Session attribute under which the logged-in account is stored.
pub const LOGIN_ACCOUNT_KEY: &str = "LOGIN_ACCOUNT";

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    Email(AccountValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the login use-case.
///
/// ## Invariants
/// - `email` is normalised (see [`Email`]).
/// - `password` is non-empty but retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use account_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" A@X.com ", "p").unwrap();
/// assert_eq!(creds.email().as_ref(), "a@x.com");
/// assert_eq!(creds.password(), "p");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::new(email).map_err(LoginValidationError::Email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account snapshot written into the session after a successful login.
///
/// Carries everything but the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAccount {
    /// Account identifier.
    pub id: AccountId,
    /// Email address at login time.
    pub email: Email,
    /// Username at login time.
    pub username: Username,
    /// Nickname at login time.
    pub nickname: Nickname,
    /// Granted roles.
    pub roles: Roles,
}

impl From<&Account> for SessionAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            email: account.email().clone(),
            username: account.username().clone(),
            nickname: account.nickname().clone(),
            roles: account.roles().clone(),
        }
    }
}
