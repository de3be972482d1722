//! In-process account store used when no database is configured.
//!
//! Mirrors the PostgreSQL adapter's contract: identifiers start at 1 and
//! increase, and email/username are unique among live accounts.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::{Account, AccountId, Email, NewAccount, Username};

const EMAIL_CONSTRAINT: &str = "accounts_email_live_key";
const USERNAME_CONSTRAINT: &str = "accounts_username_live_key";

#[derive(Debug, Default)]
struct Store {
    accounts: Vec<Account>,
    last_id: i64,
}

impl Store {
    fn conflict(
        &self,
        skip: Option<AccountId>,
        email: &Email,
        username: &Username,
    ) -> Option<&'static str> {
        let live = self
            .accounts
            .iter()
            .filter(|existing| !existing.is_deleted() && Some(existing.id()) != skip);
        for existing in live {
            if existing.email() == email {
                return Some(EMAIL_CONSTRAINT);
            }
            if existing.username() == username {
                return Some(USERNAME_CONSTRAINT);
            }
        }
        None
    }

    fn preferred<'a>(&'a self, matches: impl Fn(&Account) -> bool) -> Option<&'a Account> {
        self.accounts
            .iter()
            .filter(|account| matches(account))
            .min_by_key(|account| (account.is_deleted(), std::cmp::Reverse(account.id())))
    }
}

/// Thread-safe in-memory [`AccountRepository`].
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    store: Mutex<Store>,
}

impl InMemoryAccountRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, AccountPersistenceError> {
        self.store
            .lock()
            .map_err(|_| AccountPersistenceError::connection("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_all(&self) -> Result<Vec<Account>, AccountPersistenceError> {
        Ok(self.lock()?.accounts.clone())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountPersistenceError> {
        Ok(self.lock()?.accounts.iter().find(|a| a.id() == *id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        Ok(self.lock()?.preferred(|a| a.email() == email).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        Ok(self.lock()?.preferred(|a| a.username() == username).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, AccountPersistenceError> {
        let mut store = self.lock()?;
        if let Some(constraint) = store.conflict(None, &account.email, &account.username) {
            return Err(AccountPersistenceError::duplicate(constraint));
        }
        let next = store.last_id + 1;
        let id = AccountId::new(next)
            .map_err(|err| AccountPersistenceError::query(err.to_string()))?;
        store.last_id = next;
        let stored = Account::from_stored(id, account, false);
        store.accounts.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, account: Account) -> Result<Account, AccountPersistenceError> {
        let mut store = self.lock()?;
        if !account.is_deleted() {
            if let Some(constraint) =
                store.conflict(Some(account.id()), account.email(), account.username())
            {
                return Err(AccountPersistenceError::duplicate(constraint));
            }
        }
        let slot = store
            .accounts
            .iter_mut()
            .find(|existing| existing.id() == account.id())
            .ok_or_else(|| AccountPersistenceError::query("record not found"))?;
        *slot = account.clone();
        Ok(account)
    }
}
