//! Validated input for the create-account use-case.

use std::collections::BTreeSet;
use std::fmt;

use zeroize::Zeroizing;

use super::{AccountValidationError, Email, Nickname, Role, Username};

/// Reasons a registration payload is rejected before reaching the service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// A field failed value-type validation.
    #[error(transparent)]
    Field(#[from] AccountValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Request to create an account.
///
/// Roles are kept exactly as requested; the default role is substituted by
/// the service.
#[derive(Clone, PartialEq, Eq)]
pub struct CreateAccountRequest {
    email: Email,
    username: Username,
    nickname: Nickname,
    password: Zeroizing<String>,
    roles: BTreeSet<Role>,
}

impl CreateAccountRequest {
    /// Validate raw registration inputs.
    pub fn try_from_parts(
        email: &str,
        username: &str,
        nickname: &str,
        password: &str,
        roles: BTreeSet<Role>,
    ) -> Result<Self, RegistrationValidationError> {
        let email = Email::new(email)?;
        let username = Username::new(username)?;
        let nickname = Nickname::new(nickname)?;
        if password.is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            username,
            nickname,
            password: Zeroizing::new(password.to_owned()),
            roles,
        })
    }

    /// Requested email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Requested username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Requested nickname.
    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    /// Plaintext password to hash.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Requested roles, possibly empty.
    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }
}

impl fmt::Debug for CreateAccountRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateAccountRequest")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("nickname", &self.nickname)
            .field("password", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}
