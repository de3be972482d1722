//! Port for the caller-scoped session attribute bag.

use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum SessionStoreError {
        /// The value could not be written into the session.
        Write { message: String } => "session write failed: {message}",
    }
}

/// Keyed attribute bag scoped to one logical session.
///
/// Writes are last-write-wins; nothing is read back by the domain.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore {
    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> Result<(), SessionStoreError>;
}
