//! Builds the account service and handler state from server configuration.

use std::sync::Arc;

use tracing::info;

use account_backend::domain::AccountService;
use account_backend::domain::ports::AccountRepository;
use account_backend::inbound::http::state::HttpState;
use account_backend::outbound::memory::InMemoryAccountRepository;
use account_backend::outbound::password::Argon2PasswordHasher;
use account_backend::outbound::persistence::{
    DbPool, DieselAccountRepository, PoolConfig, run_pending_migrations,
};

use super::ServerConfig;

/// Select the account store: PostgreSQL when a URL is configured, after
/// applying pending migrations, otherwise the in-memory store.
///
/// # Errors
///
/// Returns [`std::io::Error`] when migrations fail or the pool cannot be built.
pub(crate) async fn build_repository(
    config: &ServerConfig,
) -> std::io::Result<Arc<dyn AccountRepository>> {
    let Some(url) = config.database_url.as_deref() else {
        info!("no database configured; accounts are kept in memory");
        return Ok(Arc::new(InMemoryAccountRepository::new()));
    };

    let applied = run_pending_migrations(url)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    info!(applied, "database migrations up to date");

    let pool = DbPool::new(PoolConfig::new(url))
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    Ok(Arc::new(DieselAccountRepository::new(pool)))
}

/// Wire every HTTP port to one account service over `repository`.
pub(crate) fn build_http_state(
    config: &ServerConfig,
    repository: Arc<dyn AccountRepository>,
) -> HttpState {
    let service = AccountService::new(repository, Arc::new(Argon2PasswordHasher::new()))
        .with_policy(config.policy);
    info!(policy = ?config.policy, "deleted-account policy selected");
    HttpState::from_service(Arc::new(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use account_backend::domain::DeletedAccountPolicy;
    use actix_web::cookie::Key;
    use rstest::rstest;

    fn config() -> ServerConfig {
        ServerConfig::new(Key::generate(), false, "127.0.0.1:0".parse().expect("addr"))
    }

    #[rstest]
    #[actix_rt::test]
    async fn memory_store_is_used_without_database_url() {
        let repository = build_repository(&config()).await.expect("repository");
        assert!(repository.find_all().await.expect("list").is_empty());
    }

    #[rstest]
    #[actix_rt::test]
    async fn state_lists_through_the_service() {
        let config = config().with_policy(DeletedAccountPolicy::HideEverywhere);
        let state = build_http_state(&config, Arc::new(InMemoryAccountRepository::new()));
        assert!(state.accounts.list_accounts().await.expect("list").is_empty());
    }
}
