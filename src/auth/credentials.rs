//! Consumer credentials and token pairs fed into the request signer.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Application (consumer) credentials issued by the provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerCredentials {
	/// Consumer key sent as `oauth_consumer_key`.
	pub key: String,
	/// Consumer secret; first half of every signing key.
	pub secret: TokenSecret,
}
impl ConsumerCredentials {
	/// Creates a new credential pair.
	pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { key: key.into(), secret: TokenSecret::new(secret) }
	}

	/// Returns `true` when both halves are non-blank.
	pub fn is_complete(&self) -> bool {
		!self.key.trim().is_empty() && !self.secret.expose().trim().is_empty()
	}
}
impl Debug for ConsumerCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ConsumerCredentials")
			.field("key", &self.key)
			.field("secret", &self.secret)
			.finish()
	}
}

/// Token half of the signing key: `oauth_token` plus its secret.
///
/// Both halves are empty while requesting a request token, and the secret stays empty
/// during the access-token exchange.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenPair {
	/// Token sent as `oauth_token`; omitted from the header when empty.
	pub key: String,
	/// Token secret appended to the signing key.
	pub secret: TokenSecret,
}
impl TokenPair {
	/// Creates a pair from a token and its secret.
	pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { key: key.into(), secret: TokenSecret::new(secret) }
	}

	/// Pair with a token but no secret yet.
	pub fn unsecured(key: impl Into<String>) -> Self {
		Self { key: key.into(), secret: TokenSecret::default() }
	}

	/// Pair used before any token exists.
	pub fn empty() -> Self {
		Self::default()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn blank_credentials_are_incomplete() {
		assert!(ConsumerCredentials::new("key", "secret").is_complete());
		assert!(!ConsumerCredentials::new("", "secret").is_complete());
		assert!(!ConsumerCredentials::new("key", "  ").is_complete());
	}

	#[test]
	fn debug_output_redacts_consumer_secret() {
		let rendered = format!("{:?}", ConsumerCredentials::new("key", "hunter2"));

		assert!(rendered.contains("key"));
		assert!(!rendered.contains("hunter2"));
	}
}
