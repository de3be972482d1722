//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts, including soft-deleted ones.
    ///
    /// Email and username are unique among rows where `deleted` is false.
    accounts (id) {
        /// Primary key assigned from a sequence.
        id -> Int8,
        /// Normalised email address (max 254 characters).
        email -> Varchar,
        /// Login handle (max 32 characters).
        username -> Varchar,
        /// Display nickname (max 32 characters).
        nickname -> Varchar,
        /// Encoded password hash.
        password -> Text,
        /// Upper-case role names; never empty.
        roles -> Array<Text>,
        /// Optional personal website.
        website -> Nullable<Text>,
        /// Optional self description.
        description -> Nullable<Text>,
        /// Optional phone number.
        phone -> Nullable<Varchar>,
        /// Optional gender.
        gender -> Nullable<Varchar>,
        /// Soft-delete flag.
        deleted -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
