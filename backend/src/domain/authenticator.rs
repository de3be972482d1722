//! The single credential-verification capability.
//!
//! Interactive login (by email) and framework-driven verification (by
//! username) both hand a [`CredentialSubject`] to the [`Authenticator`], so
//! the two entry points cannot drift apart.
//!
//! Hashing is memory-hard, so both encoding and verification run on tokio's
//! blocking pool rather than on the request's worker thread.

use std::sync::Arc;

use tracing::{info_span, warn};
use zeroize::Zeroizing;

use super::ports::{PasswordHashError, PasswordHasher};
use super::{Account, AccountId, PasswordHash};

/// Credential-bearing view of an account consumed by authentication code.
pub trait CredentialSubject: Send + Sync {
    /// Login handle.
    fn username(&self) -> &str;

    /// Stored password hash.
    fn password_hash(&self) -> &PasswordHash;

    /// Granted authorities, rendered as `ROLE_<NAME>`.
    fn authorities(&self) -> Vec<String>;

    /// Whether the subject may authenticate.
    fn is_enabled(&self) -> bool;
}

/// Account-backed [`CredentialSubject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountPrincipal {
    account: Account,
}

impl AccountPrincipal {
    /// Wrap an account.
    #[must_use]
    pub const fn new(account: Account) -> Self {
        Self { account }
    }

    /// Identifier of the wrapped account.
    #[must_use]
    pub const fn id(&self) -> AccountId {
        self.account.id()
    }

    /// Borrow the wrapped account.
    #[must_use]
    pub const fn account(&self) -> &Account {
        &self.account
    }
}

impl CredentialSubject for AccountPrincipal {
    fn username(&self) -> &str {
        self.account.username().as_ref()
    }

    fn password_hash(&self) -> &PasswordHash {
        self.account.password_hash()
    }

    fn authorities(&self) -> Vec<String> {
        self.account.roles().iter().map(|role| role.authority()).collect()
    }

    fn is_enabled(&self) -> bool {
        !self.account.is_deleted()
    }
}

/// Verifies plaintext passwords against credential subjects.
#[derive(Clone)]
pub struct Authenticator {
    hasher: Arc<dyn PasswordHasher>,
}

impl Authenticator {
    /// Build an authenticator over `hasher`.
    pub fn new(hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { hasher }
    }

    /// Hash a new password on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] when hashing fails or the blocking task
    /// is lost.
    pub async fn encode(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        let hasher = Arc::clone(&self.hasher);
        let plaintext = Zeroizing::new(plaintext.to_owned());
        tokio::task::spawn_blocking(move || {
            info_span!("encode password").in_scope(|| hasher.encode(&plaintext))
        })
        .await
        .map_err(|err| PasswordHashError::encode(err.to_string()))?
    }

    /// Whether `password` matches the subject's stored hash.
    ///
    /// A lost blocking task counts as a mismatch.
    pub async fn verify(&self, subject: &dyn CredentialSubject, password: &str) -> bool {
        let hasher = Arc::clone(&self.hasher);
        let hash = subject.password_hash().clone();
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || {
            info_span!("verify password").in_scope(|| hasher.matches(&password, &hash))
        })
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "password verification task failed");
            false
        })
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::MockPasswordHasher;
    use crate::domain::{Email, NewAccount, Nickname, Profile, Role, Roles, Username};

    #[fixture]
    fn account() -> Account {
        Account::from_stored(
            AccountId::new(3).expect("id"),
            NewAccount {
                email: Email::new("a@x.com").expect("email"),
                username: Username::new("alice").expect("username"),
                nickname: Nickname::new("Al").expect("nickname"),
                password: PasswordHash::new("stored-hash").expect("hash"),
                roles: Roles::new(BTreeSet::from([Role::User, Role::Admin])).expect("roles"),
                profile: Profile::default(),
            },
            false,
        )
    }

    #[rstest]
    fn principal_exposes_account_view(account: Account) {
        let principal = AccountPrincipal::new(account);
        assert_eq!(principal.username(), "alice");
        assert_eq!(principal.password_hash().as_str(), "stored-hash");
        assert_eq!(principal.authorities(), vec!["ROLE_USER", "ROLE_ADMIN"]);
        assert!(principal.is_enabled());
    }

    #[rstest]
    fn deleted_principal_is_disabled(mut account: Account) {
        account.mark_deleted();
        assert!(!AccountPrincipal::new(account).is_enabled());
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn verify_delegates_to_hasher(account: Account, #[case] matches: bool) {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_matches()
            .withf(|plain, hash| plain == "p" && hash.as_str() == "stored-hash")
            .times(1)
            .return_const(matches);
        let authenticator = Authenticator::new(Arc::new(hasher));

        assert_eq!(
            authenticator
                .verify(&AccountPrincipal::new(account), "p")
                .await,
            matches
        );
    }

    #[rstest]
    #[tokio::test]
    async fn encoding_runs_through_the_shared_hasher() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_encode()
            .with(eq("p"))
            .times(1)
            .returning(|_| Ok(PasswordHash::new("h").expect("hash")));
        let authenticator = Authenticator::new(Arc::new(hasher));

        let hash = authenticator.encode("p").await.expect("encodes");
        assert_eq!(hash.as_str(), "h");
    }

    #[rstest]
    #[tokio::test]
    async fn verification_runs_off_the_calling_thread(account: Account) {
        let caller = std::thread::current().id();
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_matches()
            .times(1)
            .returning(move |_, _| std::thread::current().id() != caller);
        let authenticator = Authenticator::new(Arc::new(hasher));

        assert!(
            authenticator
                .verify(&AccountPrincipal::new(account), "p")
                .await
        );
    }

    #[rstest]
    #[tokio::test]
    async fn encoding_failure_is_reported() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_encode()
            .times(1)
            .returning(|_| Err(PasswordHashError::encode("bad params")));
        let authenticator = Authenticator::new(Arc::new(hasher));

        let err = authenticator.encode("p").await.expect_err("fails");
        assert_eq!(err, PasswordHashError::encode("bad params"));
    }
}
