//! Secure token secret wrapper that redacts sensitive material.

// crates.io
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

const FINGERPRINT_BYTES: usize = 6;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when no secret is held (e.g. before a token secret is issued).
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Short, log-safe digest of the secret.
	pub fn fingerprint(&self) -> String {
		fingerprint(&self.0)
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Hex-encoded prefix of the SHA-256 digest of `value`, used to correlate tokens in logs
/// without recording them.
pub fn fingerprint(value: &str) -> String {
	let digest = Sha256::digest(value.as_bytes());

	digest.iter().take(FINGERPRINT_BYTES).map(|byte| format!("{byte:02x}")).collect()
}
