//! Account aggregate and its validated value types.
//!
//! An [`Account`] is only ever constructed from validated parts, so holders of
//! an `Account` can rely on the invariants documented on each field type
//! without re-checking them.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum accepted length of an email address.
pub const EMAIL_MAX: usize = 254;
/// Minimum accepted length of a username.
pub const USERNAME_MIN: usize = 2;
/// Maximum accepted length of a username.
pub const USERNAME_MAX: usize = 32;
/// Maximum accepted length of a nickname.
pub const NICKNAME_MAX: usize = 32;
/// Maximum accepted length of a phone number.
pub const PHONE_MAX: usize = 32;
/// Maximum accepted length of the gender field.
pub const GENDER_MAX: usize = 32;

/// Validation errors raised by the account value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// Identifiers are positive integers.
    #[error("account id must be a positive integer")]
    InvalidId,
    /// Email was blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email did not look like `local@domain.tld`.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Email exceeded [`EMAIL_MAX`].
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Upper bound.
        max: usize,
    },
    /// Username was blank.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username length outside the accepted range.
    #[error("username must be between {min} and {max} characters")]
    UsernameLength {
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },
    /// Username contained characters other than letters, digits, `_`, `.` or `-`.
    #[error("username may only contain letters, numbers, '_', '.' or '-'")]
    UsernameInvalidCharacters,
    /// Nickname was blank.
    #[error("nickname must not be empty")]
    EmptyNickname,
    /// Nickname exceeded [`NICKNAME_MAX`].
    #[error("nickname must be at most {max} characters")]
    NicknameTooLong {
        /// Upper bound.
        max: usize,
    },
    /// Phone exceeded [`PHONE_MAX`].
    #[error("phone must be at most {max} characters")]
    PhoneTooLong {
        /// Upper bound.
        max: usize,
    },
    /// Gender exceeded [`GENDER_MAX`].
    #[error("gender must be at most {max} characters")]
    GenderTooLong {
        /// Upper bound.
        max: usize,
    },
    /// Password hash was blank.
    #[error("password hash must not be empty")]
    EmptyPasswordHash,
    /// Role name was not recognised.
    #[error("unknown role: {0}")]
    UnknownRole(String),
    /// Role set was empty where at least one role is required.
    #[error("an account must hold at least one role")]
    EmptyRoles,
}

/// Store-assigned account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct AccountId(i64);

impl AccountId {
    /// Validate a raw identifier.
    pub fn new(raw: i64) -> Result<Self, AccountValidationError> {
        if raw <= 0 {
            return Err(AccountValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    /// The raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for AccountId {
    type Error = AccountValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for i64 {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! string_value {
    ($name:ident) => {
        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.0.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = AccountValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("static regex failed to compile: {error}"))
    })
}

/// Normalised email address: trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(raw: impl Into<String>) -> Result<Self, AccountValidationError> {
        let raw = raw.into();
        let normalised = raw.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(AccountValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let pattern = compiled(&EMAIL_RE, r"^[^@\s]+@[^@\s]+\.[^@\s]+$");
        if !pattern.is_match(&normalised) {
            return Err(AccountValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

string_value!(Email);

/// Unique login handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate a username; surrounding whitespace is trimmed.
    pub fn new(raw: impl Into<String>) -> Result<Self, AccountValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyUsername);
        }
        let length = trimmed.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
            return Err(AccountValidationError::UsernameLength {
                min: USERNAME_MIN,
                max: USERNAME_MAX,
            });
        }
        if !compiled(&USERNAME_RE, r"^[A-Za-z0-9_.\-]+$").is_match(trimmed) {
            return Err(AccountValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

string_value!(Username);

/// Name shown to other users in listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nickname(String);

impl Nickname {
    /// Validate a nickname; surrounding whitespace is trimmed.
    pub fn new(raw: impl Into<String>) -> Result<Self, AccountValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyNickname);
        }
        if trimmed.chars().count() > NICKNAME_MAX {
            return Err(AccountValidationError::NicknameTooLong { max: NICKNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

string_value!(Nickname);

/// Encoded one-way password hash.
///
/// `Debug` is redacted and the type is deliberately not `Serialize`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a [`PasswordHasher`](super::ports::PasswordHasher).
    pub fn new(encoded: impl Into<String>) -> Result<Self, AccountValidationError> {
        let encoded = encoded.into();
        if encoded.trim().is_empty() {
            return Err(AccountValidationError::EmptyPasswordHash);
        }
        Ok(Self(encoded))
    }

    /// The encoded hash string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Permission tag carried by an account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular member.
    User,
    /// Administrator.
    Admin,
}

impl Role {
    /// Canonical upper-case name, as persisted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    /// Authority string exposed to authentication frameworks.
    #[must_use]
    pub fn authority(self) -> String {
        format!("ROLE_{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = AccountValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(AccountValidationError::UnknownRole(s.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-empty set of roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeSet<Role>", into = "BTreeSet<Role>")]
pub struct Roles(BTreeSet<Role>);

impl Roles {
    /// Build a role set, rejecting an empty one.
    pub fn new(roles: BTreeSet<Role>) -> Result<Self, AccountValidationError> {
        if roles.is_empty() {
            return Err(AccountValidationError::EmptyRoles);
        }
        Ok(Self(roles))
    }

    /// Roles for a new account: the requested set, or `{USER}` when none
    /// were requested.
    #[must_use]
    pub fn from_requested(requested: BTreeSet<Role>) -> Self {
        if requested.is_empty() {
            Self::default()
        } else {
            Self(requested)
        }
    }

    /// Iterate roles in their canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    /// Borrow the underlying set.
    #[must_use]
    pub const fn as_set(&self) -> &BTreeSet<Role> {
        &self.0
    }
}

impl Default for Roles {
    fn default() -> Self {
        Self(BTreeSet::from([Role::User]))
    }
}

impl TryFrom<BTreeSet<Role>> for Roles {
    type Error = AccountValidationError;

    fn try_from(value: BTreeSet<Role>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Roles> for BTreeSet<Role> {
    fn from(value: Roles) -> Self {
        value.0
    }
}

/// Optional free-form profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Personal website.
    pub website: Option<String>,
    /// Short self description.
    pub description: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Self-reported gender.
    pub gender: Option<String>,
}

impl Profile {
    /// Build a profile, normalising blank strings to `None`.
    ///
    /// # Errors
    ///
    /// Rejects a phone longer than [`PHONE_MAX`] or a gender longer than
    /// [`GENDER_MAX`] characters.
    pub fn new(
        website: Option<String>,
        description: Option<String>,
        phone: Option<String>,
        gender: Option<String>,
    ) -> Result<Self, AccountValidationError> {
        let phone = non_blank(phone);
        if exceeds(phone.as_deref(), PHONE_MAX) {
            return Err(AccountValidationError::PhoneTooLong { max: PHONE_MAX });
        }
        let gender = non_blank(gender);
        if exceeds(gender.as_deref(), GENDER_MAX) {
            return Err(AccountValidationError::GenderTooLong { max: GENDER_MAX });
        }
        Ok(Self {
            website: non_blank(website),
            description: non_blank(description),
            phone,
            gender,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

fn exceeds(value: Option<&str>, max: usize) -> bool {
    value.is_some_and(|v| v.chars().count() > max)
}

/// Complete replacement for the mutable profile of an account.
///
/// Every field is applied, so callers wanting to keep a value must send it
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileReplacement {
    /// New username.
    pub username: Username,
    /// New nickname.
    pub nickname: Nickname,
    /// New email address.
    pub email: Email,
    /// New optional profile fields.
    pub profile: Profile,
}

/// An account that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Unique email address.
    pub email: Email,
    /// Unique username.
    pub username: Username,
    /// Display nickname.
    pub nickname: Nickname,
    /// Hash of the chosen password.
    pub password: PasswordHash,
    /// Granted roles.
    pub roles: Roles,
    /// Optional profile fields.
    pub profile: Profile,
}

/// Persisted account record.
///
/// ## Invariants
/// - `id` is assigned by the store and never changes.
/// - `roles` is never empty.
/// - `password` is a hash, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    email: Email,
    username: Username,
    nickname: Nickname,
    password: PasswordHash,
    roles: Roles,
    profile: Profile,
    deleted: bool,
}

impl Account {
    /// Materialise a stored account; used by repository adapters.
    #[must_use]
    pub fn from_stored(id: AccountId, new: NewAccount, deleted: bool) -> Self {
        let NewAccount {
            email,
            username,
            nickname,
            password,
            roles,
            profile,
        } = new;
        Self {
            id,
            email,
            username,
            nickname,
            password,
            roles,
            profile,
            deleted,
        }
    }

    /// Store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> AccountId {
        self.id
    }

    /// Email address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Nickname.
    #[must_use]
    pub const fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    /// Stored password hash.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password
    }

    /// Granted roles.
    #[must_use]
    pub const fn roles(&self) -> &Roles {
        &self.roles
    }

    /// Optional profile fields.
    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Whether the account has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Overwrite every mutable profile field. Password and roles are untouched.
    pub fn replace_profile(&mut self, replacement: ProfileReplacement) {
        let ProfileReplacement {
            username,
            nickname,
            email,
            profile,
        } = replacement;
        self.username = username;
        self.nickname = nickname;
        self.email = email;
        self.profile = profile;
    }

    /// Flag the account as deleted; the record itself is kept.
    pub fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}
