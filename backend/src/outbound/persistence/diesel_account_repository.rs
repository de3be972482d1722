//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Uniqueness of email and username among live accounts is enforced by
//! partial unique indexes; violations surface as
//! [`AccountPersistenceError::Duplicate`] carrying the index name.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::{
    Account, AccountId, Email, NewAccount, Nickname, PasswordHash, Profile, Role, Roles, Username,
};

use super::models::{AccountRow, AccountUpdate, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountPersistenceError {
    AccountPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> AccountPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => AccountPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => AccountPersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            AccountPersistenceError::duplicate(info.constraint_name().unwrap_or("unique"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            AccountPersistenceError::connection("database connection error")
        }
        _ => AccountPersistenceError::query("database error"),
    }
}

fn corrupt(id: i64, err: impl std::fmt::Display) -> AccountPersistenceError {
    AccountPersistenceError::query(format!("stored account {id} is invalid: {err}"))
}

fn row_to_account(row: AccountRow) -> Result<Account, AccountPersistenceError> {
    let id = row.id;
    let roles = row
        .roles
        .iter()
        .map(|raw| raw.parse::<Role>())
        .collect::<Result<BTreeSet<Role>, _>>()
        .and_then(Roles::new)
        .map_err(|err| corrupt(id, err))?;

    let new = NewAccount {
        email: Email::new(row.email).map_err(|err| corrupt(id, err))?,
        username: Username::new(row.username).map_err(|err| corrupt(id, err))?,
        nickname: Nickname::new(row.nickname).map_err(|err| corrupt(id, err))?,
        password: PasswordHash::new(row.password).map_err(|err| corrupt(id, err))?,
        roles,
        profile: Profile::new(row.website, row.description, row.phone, row.gender)
            .map_err(|err| corrupt(id, err))?,
    };
    let account_id = AccountId::new(id).map_err(|err| corrupt(id, err))?;
    Ok(Account::from_stored(account_id, new, row.deleted))
}

fn role_names(roles: &Roles) -> Vec<String> {
    roles.iter().map(|role| role.as_str().to_owned()).collect()
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_all(&self) -> Result<Vec<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<AccountRow> = accounts::table
            .order(accounts::id.asc())
            .select(AccountRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_account).collect()
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AccountRow> = accounts::table
            .find(id.get())
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Live rows sort before deleted ones; newest deleted row otherwise.
        let row: Option<AccountRow> = accounts::table
            .filter(accounts::email.eq(email.as_ref()))
            .order((accounts::deleted.asc(), accounts::id.desc()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AccountRow> = accounts::table
            .filter(accounts::username.eq(username.as_ref()))
            .order((accounts::deleted.asc(), accounts::id.desc()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewAccountRow {
            email: account.email.as_ref(),
            username: account.username.as_ref(),
            nickname: account.nickname.as_ref(),
            password: account.password.as_str(),
            roles: role_names(&account.roles),
            website: account.profile.website.as_deref(),
            description: account.profile.description.as_deref(),
            phone: account.profile.phone.as_deref(),
            gender: account.profile.gender.as_deref(),
        };

        let row: AccountRow = diesel::insert_into(accounts::table)
            .values(&new_row)
            .returning(AccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_account(row)
    }

    async fn update(&self, account: Account) -> Result<Account, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let profile = account.profile();
        let changes = AccountUpdate {
            email: account.email().as_ref(),
            username: account.username().as_ref(),
            nickname: account.nickname().as_ref(),
            password: account.password_hash().as_str(),
            roles: role_names(account.roles()),
            website: profile.website.as_deref(),
            description: profile.description.as_deref(),
            phone: profile.phone.as_deref(),
            gender: profile.gender.as_deref(),
            deleted: account.is_deleted(),
            updated_at: Utc::now(),
        };

        let row: AccountRow = diesel::update(accounts::table.find(account.id().get()))
            .set(&changes)
            .returning(AccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_account(row)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion and error mapping.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn row() -> AccountRow {
        AccountRow {
            id: 9,
            email: "a@x.com".to_owned(),
            username: "alice".to_owned(),
            nickname: "Al".to_owned(),
            password: "$argon2id$stub".to_owned(),
            roles: vec!["USER".to_owned(), "ADMIN".to_owned()],
            website: Some(String::new()),
            description: Some("hello".to_owned()),
            phone: None,
            gender: None,
            deleted: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert_eq!(err, AccountPersistenceError::connection("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert_eq!(err, AccountPersistenceError::query("record not found"));
    }

    #[rstest]
    fn row_converts_to_account(row: AccountRow) {
        let account = row_to_account(row).expect("valid row");

        assert_eq!(account.id().get(), 9);
        assert!(account.roles().as_set().contains(&Role::Admin));
        assert!(account.is_deleted());
        assert_eq!(account.profile().website, None);
        assert_eq!(account.profile().description.as_deref(), Some("hello"));
    }

    #[rstest]
    #[case(vec!["ROOT".to_owned()])]
    #[case(Vec::new())]
    fn invalid_roles_are_reported(mut row: AccountRow, #[case] roles: Vec<String>) {
        row.roles = roles;
        let err = row_to_account(row).expect_err("invalid roles");
        assert!(matches!(err, AccountPersistenceError::Query { .. }));
        assert!(err.to_string().contains("stored account 9"));
    }

    #[rstest]
    fn role_names_are_upper_case() {
        assert_eq!(role_names(&Roles::default()), vec!["USER".to_owned()]);
    }
}
