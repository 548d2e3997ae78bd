//! Storage contracts and built-in store implementations for handshake records.

pub mod memory;
#[cfg(feature = "sqlite")] pub mod sql;

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")] pub use sql::SqlStore;

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenRecord},
};

/// Boxed future returned by [`HandshakeStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by handshake stores.
///
/// Every mutation is row-scoped and atomic: backends apply each update with a single
/// conditional statement (or a single lock acquisition) so concurrent callbacks for
/// the same request token cannot interleave.
pub trait HandshakeStore
where
	Self: Send + Sync,
{
	/// Inserts a new record keyed by its request token.
	fn create(&self, record: TokenRecord) -> StoreFuture<'_, ()>;

	/// Fetches the record for `request_token`, if present.
	fn fetch<'a>(&'a self, request_token: &'a str) -> StoreFuture<'a, Option<TokenRecord>>;

	/// Records `verifier` while the handshake has not been granted.
	fn set_verifier<'a>(
		&'a self,
		request_token: &'a str,
		verifier: &'a str,
	) -> StoreFuture<'a, UpdateOutcome>;

	/// Swaps in the access token pair if `expected_verifier` matches the recorded one.
	fn promote<'a>(
		&'a self,
		request_token: &'a str,
		expected_verifier: &'a str,
		access: TokenPair,
	) -> StoreFuture<'a, UpdateOutcome>;

	/// Round-trips to the backend and returns its current time.
	fn ping(&self) -> StoreFuture<'_, OffsetDateTime>;
}

/// Result of a conditional record update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOutcome {
	/// The condition held and the record was updated.
	Updated,
	/// The record exists but its verifier did not match.
	VerifierMismatch,
	/// No updatable record exists (unknown key, or already granted).
	Missing,
}

/// Error type produced by [`HandshakeStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// A record with the same request token already exists.
	#[error("A handshake for this request token already exists.")]
	Duplicate,
	/// Row could not be mapped to or from a record.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
