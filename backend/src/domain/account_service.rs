//! Account lifecycle and authentication service.
//!
//! [`AccountService`] is the only place that orchestrates the account store,
//! the password hasher and the session. Its inherent methods return
//! [`AccountError`] so callers can tell every failure apart; the driving port
//! implementations map those into transport-agnostic [`Error`]s.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountRepository, AccountSummary, AccountsCommand, AccountsQuery, CredentialSubjectSource,
    LoginService, PasswordHasher, SessionStore, SessionStoreError,
};
use crate::domain::{
    Account, AccountError, AccountId, AccountPrincipal, Authenticator, CreateAccountRequest,
    CredentialSubject, DeletedAccountPolicy, Error, LOGIN_ACCOUNT_KEY, LoginCredentials,
    NewAccount, Profile, ProfileReplacement, ReadPath, Roles, SessionAccount, Username,
};

/// Service implementing every account driving port.
pub struct AccountService<R: ?Sized> {
    repository: Arc<R>,
    authenticator: Authenticator,
    policy: DeletedAccountPolicy,
}

impl<R: ?Sized> Clone for AccountService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            authenticator: self.authenticator.clone(),
            policy: self.policy,
        }
    }
}

impl<R> AccountService<R>
where
    R: AccountRepository + ?Sized,
{
    /// Create a service with the default [`DeletedAccountPolicy`].
    pub fn new(repository: Arc<R>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            repository,
            authenticator: Authenticator::new(hasher),
            policy: DeletedAccountPolicy::default(),
        }
    }

    /// Replace the deleted-account policy.
    #[must_use]
    pub fn with_policy(mut self, policy: DeletedAccountPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Email and nickname of every account visible to listings.
    pub async fn list(&self) -> Result<Vec<AccountSummary>, AccountError> {
        let accounts = self.repository.find_all().await?;
        Ok(accounts
            .into_iter()
            .filter(|account| self.policy.admits(ReadPath::Listing, account))
            .map(|account| AccountSummary {
                email: account.email().clone(),
                nickname: account.nickname().clone(),
            })
            .collect())
    }

    /// Hash the password, default the roles and persist a new account.
    ///
    /// Uniqueness is left to the store, which reports collisions as
    /// [`AccountPersistenceError::Duplicate`](crate::domain::ports::AccountPersistenceError::Duplicate).
    pub async fn create(&self, request: &CreateAccountRequest) -> Result<AccountId, AccountError> {
        let password = self.authenticator.encode(request.password()).await?;
        let account = self
            .repository
            .insert(NewAccount {
                email: request.email().clone(),
                username: request.username().clone(),
                nickname: request.nickname().clone(),
                password,
                roles: Roles::from_requested(request.roles().clone()),
                profile: Profile::default(),
            })
            .await?;
        info!(account_id = %account.id(), "account created");
        Ok(account.id())
    }

    /// Verify an email/password pair and record the account in `session`.
    ///
    /// The session is only written on success.
    pub async fn authenticate(
        &self,
        credentials: &LoginCredentials,
        session: &dyn SessionStore,
    ) -> Result<AccountId, AccountError> {
        let account = self
            .repository
            .find_by_email(credentials.email())
            .await?
            .filter(|account| self.policy.admits(ReadPath::Login, account))
            .ok_or(AccountError::EmailNotFound)?;

        let principal = AccountPrincipal::new(account);
        if !self
            .authenticator
            .verify(&principal, credentials.password())
            .await
        {
            warn!(account_id = %principal.id(), "login rejected: password mismatch");
            return Err(AccountError::PasswordMismatch);
        }

        let snapshot = serde_json::to_value(SessionAccount::from(principal.account()))
            .map_err(|err| SessionStoreError::write(err.to_string()))?;
        session.set(LOGIN_ACCOUNT_KEY, snapshot)?;
        info!(account_id = %principal.id(), "account logged in");
        Ok(principal.id())
    }

    /// Overwrite every profile field of an active account.
    pub async fn update(
        &self,
        id: AccountId,
        replacement: ProfileReplacement,
    ) -> Result<(), AccountError> {
        let mut account = self.find_active(id).await?;
        account.replace_profile(replacement);
        self.repository.update(account).await?;
        info!(account_id = %id, "account updated");
        Ok(())
    }

    /// Flag an active account as deleted and persist it.
    pub async fn delete(&self, id: AccountId) -> Result<(), AccountError> {
        let mut account = self.find_active(id).await?;
        account.mark_deleted();
        self.repository.update(account).await?;
        info!(account_id = %id, "account soft-deleted");
        Ok(())
    }

    /// Credential-bearing view of the account named `username`.
    pub async fn find_subject(&self, username: &str) -> Result<AccountPrincipal, AccountError> {
        let not_found = || AccountError::UsernameNotFound {
            username: username.to_owned(),
        };
        let Ok(username) = Username::new(username) else {
            return Err(not_found());
        };
        self.repository
            .find_by_username(&username)
            .await?
            .filter(|account| self.policy.admits(ReadPath::CredentialLookup, account))
            .map(AccountPrincipal::new)
            .ok_or_else(not_found)
    }

    /// Verify `password` for an enabled subject.
    pub async fn verify_subject(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AccountId, AccountError> {
        let principal = self.find_subject(username).await?;
        if !principal.is_enabled() {
            return Err(AccountError::Disabled);
        }
        if !self.authenticator.verify(&principal, password).await {
            warn!(account_id = %principal.id(), "credential check rejected: password mismatch");
            return Err(AccountError::PasswordMismatch);
        }
        Ok(principal.id())
    }

    async fn find_active(&self, id: AccountId) -> Result<Account, AccountError> {
        self.repository
            .find_by_id(&id)
            .await?
            .filter(|account| self.policy.admits(ReadPath::Mutation, account))
            .ok_or(AccountError::AccountNotFound { id })
    }
}

#[async_trait]
impl<R> AccountsQuery for AccountService<R>
where
    R: AccountRepository + ?Sized,
{
    async fn list_accounts(&self) -> Result<Vec<AccountSummary>, Error> {
        Ok(self.list().await?)
    }
}

#[async_trait]
impl<R> AccountsCommand for AccountService<R>
where
    R: AccountRepository + ?Sized,
{
    async fn create_account(&self, request: CreateAccountRequest) -> Result<AccountId, Error> {
        Ok(self.create(&request).await?)
    }

    async fn update_account(
        &self,
        id: AccountId,
        replacement: ProfileReplacement,
    ) -> Result<(), Error> {
        Ok(self.update(id, replacement).await?)
    }

    async fn delete_account(&self, id: AccountId) -> Result<(), Error> {
        Ok(self.delete(id).await?)
    }
}

#[async_trait(?Send)]
impl<R> LoginService for AccountService<R>
where
    R: AccountRepository + ?Sized,
{
    async fn login(
        &self,
        credentials: &LoginCredentials,
        session: &dyn SessionStore,
    ) -> Result<AccountId, Error> {
        Ok(self.authenticate(credentials, session).await?)
    }
}

#[async_trait]
impl<R> CredentialSubjectSource for AccountService<R>
where
    R: AccountRepository + ?Sized,
{
    async fn load_subject(&self, username: &str) -> Result<Box<dyn CredentialSubject>, Error> {
        let principal = self.find_subject(username).await?;
        Ok(Box::new(principal))
    }

    async fn authenticate_subject(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AccountId, Error> {
        Ok(self.verify_subject(username, password).await?)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
