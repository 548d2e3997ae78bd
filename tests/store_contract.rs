// crates.io
use time::macros;
// self
#[cfg(feature = "sqlite")] use oauth1_broker::store::SqlStore;
use oauth1_broker::{
	auth::{HandshakeState, TokenPair, TokenRecord},
	store::{HandshakeStore, MemoryStore, StoreError, UpdateOutcome},
};

fn requested(request_token: &str) -> TokenRecord {
	TokenRecord::requested_at(request_token, "xyz", macros::datetime!(2025-11-10 12:00 UTC))
}

async fn fetch(store: &dyn HandshakeStore, request_token: &str) -> TokenRecord {
	store
		.fetch(request_token)
		.await
		.expect("Fetching a handshake record should succeed.")
		.expect("Handshake record should be present.")
}

async fn exercise_create_and_fetch(store: &dyn HandshakeStore) {
	store.create(requested("abc")).await.expect("Creating a fresh record should succeed.");

	let fetched = fetch(store, "abc").await;

	assert_eq!(fetched.request_token, "abc");
	assert_eq!(fetched.token, "abc");
	assert_eq!(fetched.token_secret.expose(), "xyz");
	assert_eq!(fetched.created_at, macros::datetime!(2025-11-10 12:00 UTC));
	assert_eq!(fetched.state(), HandshakeState::Requested);

	let err = store
		.create(requested("abc"))
		.await
		.expect_err("A second record for the same request token must be rejected.");

	assert_eq!(err, StoreError::Duplicate);
	assert!(
		store.fetch("missing").await.expect("Fetching an unknown key should succeed.").is_none()
	);
}

async fn exercise_verifier_and_promotion(store: &dyn HandshakeStore) {
	store.create(requested("abc")).await.expect("Creating a fresh record should succeed.");

	for _ in 0..2 {
		let outcome =
			store.set_verifier("abc", "v1").await.expect("Setting verifier should succeed.");

		assert_eq!(outcome, UpdateOutcome::Updated);
	}

	assert_eq!(
		store.set_verifier("missing", "v1").await.expect("Unknown keys should not error."),
		UpdateOutcome::Missing,
	);
	assert_eq!(
		store
			.promote("abc", "v2", TokenPair::new("tok2", "sec2"))
			.await
			.expect("Mismatched promotion should not error."),
		UpdateOutcome::VerifierMismatch,
	);
	assert_eq!(fetch(store, "abc").await.state(), HandshakeState::Verified);
	assert_eq!(
		store
			.promote("abc", "v1", TokenPair::new("tok2", "sec2"))
			.await
			.expect("Matching promotion should succeed."),
		UpdateOutcome::Updated,
	);

	let granted = fetch(store, "abc").await;

	assert_eq!(granted.request_token, "abc");
	assert_eq!(granted.token, "tok2");
	assert_eq!(granted.token_secret.expose(), "sec2");
	assert_eq!(granted.verifier.as_deref(), Some("v1"));
	assert!(granted.granted_at.is_some());
	assert_eq!(granted.state(), HandshakeState::AccessGranted);
	assert_eq!(
		store
			.promote("abc", "v1", TokenPair::new("tok3", "sec3"))
			.await
			.expect("Promoting twice should not error."),
		UpdateOutcome::Missing,
	);
	assert_eq!(
		store.set_verifier("abc", "v9").await.expect("Late verifier should not error."),
		UpdateOutcome::Missing,
	);
	assert_eq!(fetch(store, "abc").await.token, "tok2");
}

async fn exercise_ping(store: &dyn HandshakeStore) {
	let now = store.ping().await.expect("Ping should succeed.");

	assert!(now.year() >= 2025);
}

#[tokio::test]
async fn memory_store_honors_contract() {
	let store = MemoryStore::default();

	exercise_create_and_fetch(&store).await;
	exercise_ping(&store).await;

	let store = MemoryStore::default();

	exercise_verifier_and_promotion(&store).await;

	assert_eq!(store.len(), 1);
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn sql_store_honors_contract() {
	let store = SqlStore::in_memory().await.expect("In-memory SQLite should open.");

	exercise_create_and_fetch(&store).await;
	exercise_ping(&store).await;

	let store = SqlStore::in_memory().await.expect("In-memory SQLite should open.");

	exercise_verifier_and_promotion(&store).await;
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn sql_store_schema_is_idempotent() {
	let store = SqlStore::in_memory().await.expect("In-memory SQLite should open.");

	store.create(requested("abc")).await.expect("Creating a fresh record should succeed.");
	store.ensure_schema().await.expect("Re-running the schema should succeed.");

	assert_eq!(fetch(&store, "abc").await.token_secret.expose(), "xyz");
}
