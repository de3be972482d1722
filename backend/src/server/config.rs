//! Server settings loaded via OrthoConfig and the resolved server config.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::Key;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use account_backend::domain::DeletedAccountPolicy;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Settings read from `ACCOUNTS_*` environment variables, CLI flags and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACCOUNTS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Hide soft-deleted accounts from listings, login and credential lookups.
    pub hide_deleted: Option<bool>,
    /// File holding the session key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`; on unless set to `false`.
    pub cookie_secure: Option<bool>,
    /// Fall back to a random session key when the key file is unreadable.
    pub allow_ephemeral_session_key: Option<bool>,
}

impl ServerSettings {
    /// Parse the bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the configured address is malformed.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    /// The configured key file, falling back to the mounted secret path.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether session cookies carry the `Secure` attribute.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// Whether an unreadable key file may be replaced by a random key.
    pub fn allow_ephemeral_session_key(&self) -> bool {
        self.allow_ephemeral_session_key.unwrap_or(false)
    }

    /// Deleted-account policy selected by `hide_deleted`.
    pub fn deleted_account_policy(&self) -> DeletedAccountPolicy {
        DeletedAccountPolicy::from_hide_deleted(self.hide_deleted.unwrap_or(false))
    }
}

/// Resolved configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database_url: Option<String>,
    pub(crate) policy: DeletedAccountPolicy,
}

impl ServerConfig {
    /// Construct a configuration backed by the in-memory store.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            bind_addr,
            database_url: None,
            policy: DeletedAccountPolicy::default(),
        }
    }

    /// Persist accounts in PostgreSQL at `database_url`.
    #[must_use]
    pub fn with_database_url(mut self, database_url: Option<String>) -> Self {
        self.database_url = database_url;
        self
    }

    /// Select the deleted-account policy.
    #[must_use]
    pub fn with_policy(mut self, policy: DeletedAccountPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "ACCOUNTS_BIND_ADDR",
        "ACCOUNTS_DATABASE_URL",
        "ACCOUNTS_HIDE_DELETED",
        "ACCOUNTS_SESSION_KEY_FILE",
        "ACCOUNTS_COOKIE_SECURE",
        "ACCOUNTS_ALLOW_EPHEMERAL_SESSION_KEY",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("account-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url.is_none());
        assert!(settings.cookie_secure());
        assert!(!settings.allow_ephemeral_session_key());
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from(DEFAULT_SESSION_KEY_FILE)
        );
        assert_eq!(
            settings.deleted_account_policy(),
            DeletedAccountPolicy::Legacy
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("ACCOUNTS_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "ACCOUNTS_DATABASE_URL",
                Some("postgres://localhost/accounts".to_owned()),
            ),
            ("ACCOUNTS_HIDE_DELETED", Some("true".to_owned())),
            ("ACCOUNTS_SESSION_KEY_FILE", Some("/tmp/key".to_owned())),
            ("ACCOUNTS_COOKIE_SECURE", Some("false".to_owned())),
            ("ACCOUNTS_ALLOW_EPHEMERAL_SESSION_KEY", None),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("valid address").port(),
            9000
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/accounts")
        );
        assert!(!settings.cookie_secure());
        assert!(!settings.allow_ephemeral_session_key());
        assert_eq!(settings.session_key_file(), PathBuf::from("/tmp/key"));
        assert_eq!(
            settings.deleted_account_policy(),
            DeletedAccountPolicy::HideEverywhere
        );
    }

    #[rstest]
    fn hide_deleted_alone_selects_hide_everywhere() {
        let _guard = lock_env(VARS.map(|name| {
            let value = (name == "ACCOUNTS_HIDE_DELETED").then(|| "true".to_owned());
            (name, value)
        }));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.deleted_account_policy(),
            DeletedAccountPolicy::HideEverywhere
        );
        assert!(settings.cookie_secure());
    }

    #[rstest]
    #[case("true", true)]
    #[case("false", false)]
    fn ephemeral_key_opt_in_is_read_from_environment(#[case] raw: &str, #[case] expected: bool) {
        let _guard = lock_env([
            ("ACCOUNTS_HIDE_DELETED", None),
            ("ACCOUNTS_COOKIE_SECURE", None),
            ("ACCOUNTS_ALLOW_EPHEMERAL_SESSION_KEY", Some(raw.to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.allow_ephemeral_session_key(), expected);
    }
}
