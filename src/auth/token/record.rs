//! Handshake token records and their in-place lifecycle.

// self
use crate::{
	_prelude::*,
	auth::{HandshakeState, TokenPair, TokenSecret},
};

/// One persisted handshake attempt.
///
/// The record is keyed by the request token for its whole life. `token`/`token_secret`
/// start out as the request token pair and are overwritten in place with the access
/// token pair once the exchange succeeds.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
	/// Request token issued in the first leg; immutable lookup key.
	pub request_token: String,
	/// Current `oauth_token` value (request token, then access token).
	pub token: String,
	/// Current `oauth_token_secret` value; never exposed externally.
	pub token_secret: TokenSecret,
	/// Verifier delivered by the provider callback.
	pub verifier: Option<String>,
	/// Creation instant.
	pub created_at: OffsetDateTime,
	/// Last mutation instant.
	pub updated_at: OffsetDateTime,
	/// Instant the access token replaced the request token.
	pub granted_at: Option<OffsetDateTime>,
}
impl TokenRecord {
	/// Builds a freshly requested record stamped with the current UTC instant.
	pub fn requested(request_token: impl Into<String>, secret: impl Into<String>) -> Self {
		Self::requested_at(request_token, secret, OffsetDateTime::now_utc())
	}

	/// Builds a freshly requested record stamped with `instant`.
	pub fn requested_at(
		request_token: impl Into<String>,
		secret: impl Into<String>,
		instant: OffsetDateTime,
	) -> Self {
		let request_token = request_token.into();

		Self {
			token: request_token.clone(),
			request_token,
			token_secret: TokenSecret::new(secret),
			verifier: None,
			created_at: instant,
			updated_at: instant,
			granted_at: None,
		}
	}

	/// Derives the stored state from verifier/grant columns.
	pub fn state(&self) -> HandshakeState {
		if self.granted_at.is_some() {
			HandshakeState::AccessGranted
		} else if self.verifier.is_some() {
			HandshakeState::Verified
		} else {
			HandshakeState::Requested
		}
	}

	/// Returns `true` once the access token has been stored.
	pub fn is_granted(&self) -> bool {
		self.granted_at.is_some()
	}

	/// Returns `true` when a verifier equal to `verifier` has been recorded.
	pub fn verifier_matches(&self, verifier: &str) -> bool {
		self.verifier.as_deref() == Some(verifier)
	}

	/// Records (or re-records) the callback verifier.
	pub fn record_verifier(&mut self, verifier: impl Into<String>, instant: OffsetDateTime) {
		self.verifier = Some(verifier.into());
		self.updated_at = instant;
	}

	/// Overwrites the token columns with the access token pair.
	pub fn promote(&mut self, access: TokenPair, instant: OffsetDateTime) {
		self.token = access.key;
		self.token_secret = access.secret;
		self.updated_at = instant;
		self.granted_at = Some(instant);
	}

	/// Token pair currently held by the record.
	pub fn token_pair(&self) -> TokenPair {
		TokenPair { key: self.token.clone(), secret: self.token_secret.clone() }
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRecord")
			.field("request_token", &self.request_token)
			.field("token", &self.token)
			.field("token_secret", &"<redacted>")
			.field("verifier", &self.verifier)
			.field("created_at", &self.created_at)
			.field("updated_at", &self.updated_at)
			.field("granted_at", &self.granted_at)
			.finish()
	}
}
