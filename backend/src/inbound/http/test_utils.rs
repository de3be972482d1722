//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{AccountService, PasswordHash};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryAccountRepository;

/// Cookie name used by the session middleware.
pub const SESSION_COOKIE: &str = "session";

/// Session middleware with a fresh key per call and `Secure` disabled for
/// plain-HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Cheap deterministic hasher so handler tests avoid Argon2's cost.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixHasher;

impl PasswordHasher for PrefixHasher {
    fn encode(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        PasswordHash::new(format!("hashed:{plaintext}"))
            .map_err(|err| PasswordHashError::encode(err.to_string()))
    }

    fn matches(&self, plaintext: &str, hash: &PasswordHash) -> bool {
        hash.as_str()
            .strip_prefix("hashed:")
            .is_some_and(|stored| stored == plaintext)
    }
}

/// Handler state over a fresh in-memory store.
pub fn memory_state() -> HttpState {
    let service = AccountService::new(
        Arc::new(InMemoryAccountRepository::new()),
        Arc::new(PrefixHasher),
    );
    HttpState::from_service(Arc::new(service))
}
