//! Thread-safe in-memory [`HandshakeStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenRecord},
	store::{HandshakeStore, StoreError, StoreFuture, UpdateOutcome},
};

type StoreMap = Arc<RwLock<HashMap<String, TokenRecord>>>;

/// Thread-safe storage backend that keeps records in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of stored handshakes.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no handshake is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn create_now(map: StoreMap, record: TokenRecord) -> Result<(), StoreError> {
		let mut guard = map.write();

		if guard.contains_key(&record.request_token) {
			return Err(StoreError::Duplicate);
		}

		guard.insert(record.request_token.clone(), record);

		Ok(())
	}

	fn set_verifier_now(map: StoreMap, request_token: &str, verifier: &str) -> UpdateOutcome {
		let mut guard = map.write();

		match guard.get_mut(request_token) {
			Some(record) if !record.is_granted() => {
				record.record_verifier(verifier, OffsetDateTime::now_utc());

				UpdateOutcome::Updated
			},
			_ => UpdateOutcome::Missing,
		}
	}

	fn promote_now(
		map: StoreMap,
		request_token: &str,
		expected_verifier: &str,
		access: TokenPair,
	) -> UpdateOutcome {
		let mut guard = map.write();

		match guard.get_mut(request_token) {
			Some(record) if record.is_granted() => UpdateOutcome::Missing,
			Some(record) if record.verifier_matches(expected_verifier) => {
				record.promote(access, OffsetDateTime::now_utc());

				UpdateOutcome::Updated
			},
			Some(_) => UpdateOutcome::VerifierMismatch,
			None => UpdateOutcome::Missing,
		}
	}
}
impl HandshakeStore for MemoryStore {
	fn create(&self, record: TokenRecord) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::create_now(map, record) })
	}

	fn fetch<'a>(&'a self, request_token: &'a str) -> StoreFuture<'a, Option<TokenRecord>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(request_token).cloned()) })
	}

	fn set_verifier<'a>(
		&'a self,
		request_token: &'a str,
		verifier: &'a str,
	) -> StoreFuture<'a, UpdateOutcome> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::set_verifier_now(map, request_token, verifier)) })
	}

	fn promote<'a>(
		&'a self,
		request_token: &'a str,
		expected_verifier: &'a str,
		access: TokenPair,
	) -> StoreFuture<'a, UpdateOutcome> {
		let map = self.0.clone();

		Box::pin(
			async move { Ok(Self::promote_now(map, request_token, expected_verifier, access)) },
		)
	}

	fn ping(&self) -> StoreFuture<'_, OffsetDateTime> {
		Box::pin(async { Ok(OffsetDateTime::now_utc()) })
	}
}
