//! Which read paths may observe soft-deleted accounts.

use super::Account;

/// Read path an account lookup serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPath {
    /// Public account listing.
    Listing,
    /// Interactive login by email.
    Login,
    /// Framework-driven credential lookup by username.
    CredentialLookup,
    /// Lookup preceding an update or delete.
    Mutation,
}

/// Single filter deciding whether deleted accounts are visible.
///
/// `Mutation` lookups never see deleted accounts. Under [`Self::Legacy`] the
/// other paths do; under [`Self::HideEverywhere`] none do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletedAccountPolicy {
    /// Listing, login and credential lookup include deleted accounts.
    #[default]
    Legacy,
    /// Every read path excludes deleted accounts.
    HideEverywhere,
}

impl DeletedAccountPolicy {
    /// Policy selected by the `hide_deleted` setting.
    #[must_use]
    pub const fn from_hide_deleted(hide_deleted: bool) -> Self {
        if hide_deleted {
            Self::HideEverywhere
        } else {
            Self::Legacy
        }
    }

    /// Whether deleted accounts are visible on `path`.
    #[must_use]
    pub const fn shows_deleted(self, path: ReadPath) -> bool {
        match (self, path) {
            (_, ReadPath::Mutation) | (Self::HideEverywhere, _) => false,
            (Self::Legacy, _) => true,
        }
    }

    /// Whether `account` is visible on `path`.
    #[must_use]
    pub const fn admits(self, path: ReadPath, account: &Account) -> bool {
        !account.is_deleted() || self.shows_deleted(path)
    }
}
