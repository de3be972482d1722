//! End-to-end account lifecycle through the public library API, using the
//! in-memory store and the Argon2 hasher.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use account_backend::domain::ports::{
    AccountRepository, AccountsCommand, AccountsQuery, CredentialSubjectSource, LoginService,
    SessionStore, SessionStoreError,
};
use account_backend::domain::{
    AccountError, AccountId, AccountService, CreateAccountRequest, CredentialSubject,
    DeletedAccountPolicy, Email, ErrorCode, LOGIN_ACCOUNT_KEY, LoginCredentials, Nickname, Profile,
    ProfileReplacement, Role, SessionAccount, Username,
};
use account_backend::outbound::memory::InMemoryAccountRepository;
use account_backend::outbound::password::Argon2PasswordHasher;
use rstest::{fixture, rstest};
use serde_json::Value;

#[derive(Default)]
struct RecordingSession {
    values: Mutex<HashMap<String, Value>>,
}

impl RecordingSession {
    fn account(&self) -> Option<SessionAccount> {
        let values = self.values.lock().expect("session lock");
        values
            .get(LOGIN_ACCOUNT_KEY)
            .cloned()
            .map(|value| serde_json::from_value(value).expect("snapshot decodes"))
    }
}

impl SessionStore for RecordingSession {
    fn set(&self, key: &str, value: Value) -> Result<(), SessionStoreError> {
        self.values
            .lock()
            .expect("session lock")
            .insert(key.to_owned(), value);
        Ok(())
    }
}

struct Harness {
    repository: Arc<InMemoryAccountRepository>,
    service: AccountService<InMemoryAccountRepository>,
}

#[fixture]
fn harness() -> Harness {
    let repository = Arc::new(InMemoryAccountRepository::new());
    let service = AccountService::new(repository.clone(), Arc::new(Argon2PasswordHasher::new()));
    Harness {
        repository,
        service,
    }
}

fn alice(roles: BTreeSet<Role>) -> CreateAccountRequest {
    CreateAccountRequest::try_from_parts("a@x.com", "alice", "Al", "p", roles)
        .expect("valid registration")
}

fn credentials(password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts("a@x.com", password).expect("valid credentials")
}

fn replacement() -> ProfileReplacement {
    ProfileReplacement {
        username: Username::new("alicia").expect("username"),
        nickname: Nickname::new("Ally").expect("nickname"),
        email: Email::new("alicia@x.com").expect("email"),
        profile: Profile::new(Some("https://alicia.example".to_owned()), None, None, None)
            .expect("profile"),
    }
}

#[rstest]
#[tokio::test]
async fn full_lifecycle(harness: Harness) {
    let Harness {
        repository,
        service,
    } = harness;

    let id = service
        .create_account(alice(BTreeSet::new()))
        .await
        .expect("created");
    assert_eq!(id.get(), 1);

    let stored = repository
        .find_by_id(&id)
        .await
        .expect("lookup")
        .expect("stored");
    assert_ne!(stored.password_hash().as_str(), "p");
    assert_eq!(stored.roles().iter().collect::<Vec<_>>(), vec![Role::User]);

    let session = RecordingSession::default();
    let logged_in = service
        .login(&credentials("p"), &session)
        .await
        .expect("login");
    assert_eq!(logged_in, id);
    let snapshot = session.account().expect("snapshot written");
    assert_eq!(snapshot.id, id);

    let rejected = RecordingSession::default();
    let err = service
        .login(&credentials("wrong"), &rejected)
        .await
        .expect_err("mismatch");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert!(rejected.account().is_none());

    service
        .update_account(id, replacement())
        .await
        .expect("updated");
    let listed = service.list_accounts().await.expect("listed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].email.as_ref(), "alicia@x.com");
    assert_eq!(listed[0].nickname.as_ref(), "Ally");

    service.delete_account(id).await.expect("deleted");
    let stored = repository
        .find_by_id(&id)
        .await
        .expect("lookup")
        .expect("record kept");
    assert!(stored.is_deleted());

    let err = service
        .update_account(id, replacement())
        .await
        .expect_err("deleted account");
    assert_eq!(err.code(), ErrorCode::NotFound);
    let err = service.delete_account(id).await.expect_err("second delete");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn requested_roles_are_kept(harness: Harness) {
    let roles = BTreeSet::from([Role::Admin]);
    let id = harness
        .service
        .create_account(alice(roles))
        .await
        .expect("created");

    let subject = harness.service.load_subject("alice").await.expect("subject");
    assert_eq!(subject.authorities(), vec!["ROLE_ADMIN".to_owned()]);
    assert!(subject.is_enabled());
    assert_eq!(
        harness
            .service
            .authenticate_subject("alice", "p")
            .await
            .expect("authenticated"),
        id
    );
}

#[rstest]
#[tokio::test]
async fn deleted_subject_is_disabled(harness: Harness) {
    let id = harness
        .service
        .create_account(alice(BTreeSet::new()))
        .await
        .expect("created");
    harness.service.delete_account(id).await.expect("deleted");

    let subject = harness.service.load_subject("alice").await.expect("subject");
    assert!(!subject.is_enabled());
    let err = harness
        .service
        .verify_subject("alice", "p")
        .await
        .expect_err("disabled");
    assert!(matches!(err, AccountError::Disabled));
}

#[rstest]
#[tokio::test]
async fn hide_everywhere_policy_hides_deleted_accounts() {
    let repository = Arc::new(InMemoryAccountRepository::new());
    let service = AccountService::new(repository, Arc::new(Argon2PasswordHasher::new()))
        .with_policy(DeletedAccountPolicy::HideEverywhere);
    let id = service
        .create_account(alice(BTreeSet::new()))
        .await
        .expect("created");
    service.delete_account(id).await.expect("deleted");

    assert!(service.list_accounts().await.expect("listed").is_empty());
    let err = service
        .login(&credentials("p"), &RecordingSession::default())
        .await
        .expect_err("hidden");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn email_can_be_reused_after_delete(harness: Harness) {
    let first = harness
        .service
        .create_account(alice(BTreeSet::new()))
        .await
        .expect("created");
    harness.service.delete_account(first).await.expect("deleted");

    let second: AccountId = harness
        .service
        .create_account(alice(BTreeSet::new()))
        .await
        .expect("re-created");
    assert_ne!(first, second);
}
