//! Domain primitives, services and ports.
//!
//! Purpose: define the account aggregate, its validated value types and the
//! [`AccountService`] orchestrating the account store, password hasher and
//! session. Nothing here imports actix, Diesel or any other adapter concern.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - Account (alias to `account::Account`): persisted account record.
//! - AccountService: implements every account driving port.

pub mod account;
pub mod account_error;
pub mod account_service;
pub mod auth;
pub mod authenticator;
pub mod deleted_account_policy;
pub mod error;
pub mod ports;
pub mod registration;
pub mod trace_id;

pub use self::account::{
    Account, AccountId, AccountValidationError, EMAIL_MAX, Email, GENDER_MAX, NICKNAME_MAX,
    NewAccount, Nickname, PHONE_MAX, PasswordHash, Profile, ProfileReplacement, Role, Roles,
    USERNAME_MAX, USERNAME_MIN, Username,
};
pub use self::account_error::AccountError;
pub use self::account_service::AccountService;
pub use self::auth::{LOGIN_ACCOUNT_KEY, LoginCredentials, LoginValidationError, SessionAccount};
pub use self::authenticator::{AccountPrincipal, Authenticator, CredentialSubject};
pub use self::deleted_account_policy::{DeletedAccountPolicy, ReadPath};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::registration::{CreateAccountRequest, RegistrationValidationError};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use account_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
