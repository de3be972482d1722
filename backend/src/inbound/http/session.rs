//! Session adapter keeping HTTP handlers free of framework-specific logic.
//!
//! [`SessionContext`] wraps the actix session and implements the domain
//! [`SessionStore`] port so the login use-case can write into the cookie
//! session without knowing about actix.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde_json::Value;

use crate::domain::ports::{SessionStore, SessionStoreError};

/// Newtype wrapper exposing domain-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }
}

impl SessionStore for SessionContext {
    fn set(&self, key: &str, value: Value) -> Result<(), SessionStoreError> {
        self.0
            .insert(key, value)
            .map_err(|error| SessionStoreError::write(error.to_string()))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
