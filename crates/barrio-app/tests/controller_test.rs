//! Integration tests for the session controller.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - The published snapshot has the expected mode, token and error
//! - The token store saw exactly the reads and writes the policy allows

use barrio_app::SessionController;
use barrio_core::{
    Credentials, Mode, SessionConfig, SessionToken, SignInOrdering, TokenPersistence,
};
use barrio_harness::{
    GatedIdentityProvider, INVALID_PASSWORD, MemoryTokenStore, ScriptedIdentityProvider,
};
use barrio_store::ChaoticTokenStore;

fn provider() -> ScriptedIdentityProvider {
    ScriptedIdentityProvider::new().with_account("a@b.com", "right", "tok-456")
}

fn controller(
    store: MemoryTokenStore,
    config: SessionConfig,
) -> SessionController<MemoryTokenStore, ScriptedIdentityProvider> {
    SessionController::new(store, provider(), config)
}

fn read_write() -> SessionConfig {
    SessionConfig { persistence: TokenPersistence::ReadWrite, ..SessionConfig::default() }
}

fn latest_issued() -> SessionConfig {
    SessionConfig { ordering: SignInOrdering::LatestIssued, ..SessionConfig::default() }
}

fn creds(password: &str) -> Credentials {
    Credentials::new("a@b.com", password)
}

#[tokio::test]
async fn starts_loading() {
    let controller = controller(MemoryTokenStore::new(), SessionConfig::default());
    let snapshot = controller.snapshot();

    assert_eq!(snapshot.mode(), Mode::Loading);
    assert!(snapshot.is_loading());
    assert!(snapshot.token().is_none());
    assert!(snapshot.last_error().is_none());
}

#[tokio::test]
async fn restore_without_stored_token() {
    let controller = controller(MemoryTokenStore::new(), SessionConfig::default());

    let snapshot = controller.restore().await;

    assert_eq!(snapshot.mode(), Mode::SignedOut);
    assert!(snapshot.token().is_none());
    assert!(snapshot.last_error().is_none());
}

#[tokio::test]
async fn restore_with_stored_token() {
    let store = MemoryTokenStore::with_value("userToken", "tok-123");
    let controller = controller(store, SessionConfig::default());

    let snapshot = controller.restore().await;

    assert_eq!(snapshot.mode(), Mode::SignedIn);
    assert_eq!(snapshot.token(), Some(&SessionToken::new("tok-123")));
}

#[tokio::test]
async fn restore_uses_configured_key() {
    let store = MemoryTokenStore::with_value("altKey", "tok-alt");
    let config = SessionConfig { token_key: "altKey".into(), ..SessionConfig::default() };
    let controller = controller(store, config);

    assert_eq!(controller.restore().await.token(), Some(&SessionToken::new("tok-alt")));
}

#[tokio::test]
async fn restore_runs_once() {
    let store = MemoryTokenStore::with_value("userToken", "tok-123");
    let controller = controller(store.clone(), SessionConfig::default());

    let first = controller.restore().await;
    controller.sign_out();
    let second = controller.restore().await;

    assert_eq!(first.mode(), Mode::SignedIn);
    assert_eq!(second.mode(), Mode::SignedOut);
    assert!(!second.is_loading());
    assert_eq!(store.read_count(), 1);
}

#[tokio::test]
async fn restore_fails_open_on_storage_error() {
    let store = ChaoticTokenStore::always_failing(MemoryTokenStore::with_value("userToken", "t"));
    let controller = SessionController::new(store, provider(), SessionConfig::default());

    let snapshot = controller.restore().await;

    assert_eq!(snapshot.mode(), Mode::SignedOut);
    assert!(snapshot.last_error().is_none());
    assert_eq!(controller.store().failure_count(), 1);
}

#[tokio::test]
async fn sign_in_with_wrong_password() {
    let controller = controller(MemoryTokenStore::new(), SessionConfig::default());
    controller.restore().await;

    let snapshot = controller.sign_in(creds("wrong")).await;

    assert_eq!(snapshot.mode(), Mode::SignedOut);
    assert!(snapshot.token().is_none());
    assert_eq!(snapshot.last_error(), Some(INVALID_PASSWORD));
}

#[tokio::test]
async fn sign_in_with_right_password() {
    let controller = controller(MemoryTokenStore::new(), SessionConfig::default());
    controller.restore().await;

    let snapshot = controller.sign_in(creds("right")).await;

    assert_eq!(snapshot.mode(), Mode::SignedIn);
    assert_eq!(snapshot.token(), Some(&SessionToken::new("tok-456")));
    assert!(snapshot.last_error().is_none());
}

#[tokio::test]
async fn provider_outage_message_is_shown() {
    let provider = provider();
    provider.set_outage(Some("A network error has occurred."));
    let controller =
        SessionController::new(MemoryTokenStore::new(), provider, SessionConfig::default());
    controller.restore().await;

    let snapshot = controller.sign_in(creds("right")).await;

    assert_eq!(snapshot.last_error(), Some("A network error has occurred."));
}

#[tokio::test]
async fn sign_out_is_synchronous_and_clears_everything() {
    let store = MemoryTokenStore::new();
    let controller = controller(store.clone(), SessionConfig::default());
    controller.restore().await;
    controller.sign_in(creds("right")).await;

    let snapshot = controller.sign_out();

    assert_eq!(snapshot.mode(), Mode::SignedOut);
    assert!(snapshot.token().is_none());
    assert!(snapshot.last_error().is_none());
    assert_eq!(controller.pending_store_writes(), 0);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn sign_out_clears_previous_error() {
    let controller = controller(MemoryTokenStore::new(), SessionConfig::default());
    controller.restore().await;
    controller.sign_in(creds("wrong")).await;

    assert!(controller.sign_out().last_error().is_none());
}

#[tokio::test]
async fn read_only_policy_never_writes() {
    let store = MemoryTokenStore::new();
    let controller = controller(store.clone(), SessionConfig::default());
    controller.restore().await;
    controller.sign_in(creds("right")).await;
    controller.sign_out();
    controller.flush_store_writes().await;

    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn read_write_policy_persists_across_restarts() {
    let store = MemoryTokenStore::new();

    let first = controller(store.clone(), read_write());
    first.restore().await;
    first.sign_in(creds("right")).await;
    assert_eq!(store.peek("userToken"), Some("tok-456".to_string()));

    let second = controller(store.clone(), read_write());
    assert_eq!(second.restore().await.token(), Some(&SessionToken::new("tok-456")));

    second.sign_out();
    assert_eq!(second.pending_store_writes(), 1);
    second.flush_store_writes().await;
    assert_eq!(store.peek("userToken"), None);

    let third = controller(store, read_write());
    assert_eq!(third.restore().await.mode(), Mode::SignedOut);
}

#[tokio::test]
async fn empty_provider_token_survives_restart() {
    let store = MemoryTokenStore::new();
    let provider = ScriptedIdentityProvider::new().with_account("a@b.com", "right", "");

    let first = SessionController::new(store.clone(), provider.clone(), read_write());
    first.restore().await;
    assert_eq!(first.sign_in(creds("right")).await.mode(), Mode::SignedIn);
    assert_eq!(store.peek("userToken"), Some(String::new()));

    let second = SessionController::new(store, provider, read_write());
    let snapshot = second.restore().await;

    assert_eq!(snapshot.mode(), Mode::SignedIn);
    assert_eq!(snapshot.token(), Some(&SessionToken::new("")));
}

#[tokio::test]
async fn failed_sign_in_clears_stored_token() {
    let store = MemoryTokenStore::with_value("userToken", "tok-123");
    let first = controller(store.clone(), read_write());
    assert_eq!(first.restore().await.mode(), Mode::SignedIn);

    let snapshot = first.sign_in(creds("wrong")).await;

    assert_eq!(snapshot.last_error(), Some(INVALID_PASSWORD));
    assert_eq!(store.peek("userToken"), None);

    let restarted = controller(store, read_write());
    assert_eq!(restarted.restore().await.mode(), Mode::SignedOut);
}

#[tokio::test]
async fn failed_sign_in_leaves_store_alone_when_read_only() {
    let store = MemoryTokenStore::with_value("userToken", "tok-123");
    let controller = controller(store.clone(), SessionConfig::default());
    controller.restore().await;

    controller.sign_in(creds("wrong")).await;

    assert_eq!(store.peek("userToken"), Some("tok-123".to_string()));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn config_is_kept_as_given() {
    let config = SessionConfig {
        token_key: "altKey".into(),
        persistence: TokenPersistence::ReadWrite,
        ordering: SignInOrdering::LatestIssued,
    };
    let controller = controller(MemoryTokenStore::new(), config.clone());

    assert_eq!(controller.config(), config);
}

#[tokio::test]
async fn failed_store_write_keeps_session() {
    let store = ChaoticTokenStore::with_seed(MemoryTokenStore::new(), 1.0, 1);
    let controller = SessionController::new(store, provider(), read_write());
    controller.restore().await;

    let snapshot = controller.sign_in(creds("right")).await;

    assert_eq!(snapshot.mode(), Mode::SignedIn);
    assert_eq!(controller.pending_store_writes(), 0);
    assert_eq!(controller.store().inner().peek("userToken"), None);
}

#[tokio::test]
async fn subscribers_see_each_transition() {
    let controller = controller(MemoryTokenStore::new(), SessionConfig::default());
    let mut updates = controller.subscribe();
    assert!(updates.borrow_and_update().is_loading());

    controller.restore().await;
    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().mode(), Mode::SignedOut);

    controller.sign_in(creds("right")).await;
    assert_eq!(updates.borrow_and_update().mode(), Mode::SignedIn);

    controller.sign_out();
    let snapshot = updates.borrow_and_update().clone();
    assert_eq!(snapshot.mode(), Mode::SignedOut);
    assert_eq!(snapshot.revision(), 3);
}

#[tokio::test]
async fn overlapping_sign_ins_apply_in_completion_order() {
    let (provider, mut gate) = GatedIdentityProvider::new();
    let controller =
        SessionController::new(MemoryTokenStore::new(), provider, SessionConfig::default());
    controller.restore().await;
    let mut updates = controller.subscribe();

    let first = controller.sign_in(Credentials::new("first@b.com", "pw"));
    let second = controller.sign_in(Credentials::new("second@b.com", "pw"));
    let resolve = async {
        let a = gate.next().await.unwrap();
        let b = gate.next().await.unwrap();
        assert_eq!(a.email, "first@b.com");

        b.succeed("tok-second");
        updates.changed().await.unwrap();
        a.succeed("tok-first");
    };

    tokio::join!(first, second, resolve);

    // The earlier call resolved last, so it wins
    assert_eq!(controller.snapshot().token(), Some(&SessionToken::new("tok-first")));
}

#[tokio::test]
async fn late_sign_in_resurrects_session_by_default() {
    let (provider, mut gate) = GatedIdentityProvider::new();
    let controller =
        SessionController::new(MemoryTokenStore::new(), provider, SessionConfig::default());
    controller.restore().await;

    let sign_in = controller.sign_in(creds("right"));
    let sign_out_then_resolve = async {
        let pending = gate.next().await.unwrap();
        controller.sign_out();
        pending.succeed("tok-late");
    };

    tokio::join!(sign_in, sign_out_then_resolve);

    assert_eq!(controller.snapshot().mode(), Mode::SignedIn);
}

#[tokio::test]
async fn latest_issued_discards_late_results() {
    let (provider, mut gate) = GatedIdentityProvider::new();
    let controller = SessionController::new(MemoryTokenStore::new(), provider, latest_issued());
    controller.restore().await;

    let sign_in = controller.sign_in(creds("right"));
    let sign_out_then_resolve = async {
        let pending = gate.next().await.unwrap();
        controller.sign_out();
        pending.succeed("tok-late");
    };

    let (snapshot, ()) = tokio::join!(sign_in, sign_out_then_resolve);

    assert_eq!(snapshot.mode(), Mode::SignedOut);
    assert_eq!(controller.snapshot().mode(), Mode::SignedOut);
}

#[tokio::test]
async fn latest_issued_keeps_newest_attempt() {
    let (provider, mut gate) = GatedIdentityProvider::new();
    let controller = SessionController::new(MemoryTokenStore::new(), provider, latest_issued());
    controller.restore().await;
    let mut updates = controller.subscribe();

    let first = controller.sign_in(Credentials::new("first@b.com", "pw"));
    let second = controller.sign_in(Credentials::new("second@b.com", "pw"));
    let resolve = async {
        let a = gate.next().await.unwrap();
        let b = gate.next().await.unwrap();

        b.succeed("tok-second");
        updates.changed().await.unwrap();
        a.fail("too late");
    };

    tokio::join!(first, second, resolve);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.token(), Some(&SessionToken::new("tok-second")));
    assert!(snapshot.last_error().is_none());
}
