//! Internal Diesel row structs for the `accounts` table.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::accounts;

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub nickname: String,
    pub password: String,
    pub roles: Vec<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub deleted: bool,
    #[expect(dead_code, reason = "audit column, not surfaced to the domain")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "audit column, not surfaced to the domain")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating account records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub nickname: &'a str,
    pub password: &'a str,
    pub roles: Vec<String>,
    pub website: Option<&'a str>,
    pub description: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub gender: Option<&'a str>,
}

/// Full-row changeset; `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = accounts)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AccountUpdate<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub nickname: &'a str,
    pub password: &'a str,
    pub roles: Vec<String>,
    pub website: Option<&'a str>,
    pub description: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub gender: Option<&'a str>,
    pub deleted: bool,
    pub updated_at: DateTime<Utc>,
}
