//! Broker-level error types shared across the signer, flows, stores, and the server boundary.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const BODY_PREVIEW_LEN: usize = 256;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Provider returned a response the handshake cannot use.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Handshake key is unknown or not in the state the step requires.
	#[error(transparent)]
	NotFound(#[from] NotFoundError),
}
impl Error {
	/// Returns `true` when the error belongs to the not-found class (HTTP 404 at the boundary).
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound(_))
	}

	/// Stable label for logs and metrics.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Storage(_) => "storage",
			Self::Config(_) => "config",
			Self::Protocol(_) => "protocol",
			Self::Transport(_) => "transport",
			Self::NotFound(_) => "not_found",
		}
	}
}

/// Configuration and validation failures; fatal when raised at startup.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Consumer key or secret is unset.
	#[error("Consumer key and consumer secret must both be set.")]
	MissingConsumerCredentials,
	/// A required setting is absent.
	#[error("Required setting `{key}` is missing.")]
	MissingSetting {
		/// Dotted configuration key.
		key: &'static str,
	},
	/// A URL-valued setting cannot be parsed.
	#[error("Setting `{key}` is not a valid URL.")]
	InvalidUrl {
		/// Dotted configuration key.
		key: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Outbound timeout must be positive.
	#[error("Setting `provider.timeout_secs` must be greater than zero.")]
	InvalidTimeout,
	/// Bind address cannot be parsed.
	#[error("Server bind address `{address}` is invalid.")]
	InvalidBindAddress {
		/// Host/port pair that failed to parse.
		address: String,
	},
	/// Provider endpoints failed validation.
	#[error(transparent)]
	Provider(#[from] crate::provider::ProviderEndpointsError),
	/// Configuration sources could not be merged.
	#[error("Configuration sources could not be loaded.")]
	Source(#[from] config::ConfigError),
	/// Merged configuration does not match the expected shape.
	#[error("Configuration is invalid at `{}`.", .0.path())]
	Shape(#[from] serde_path_to_error::Error<config::ConfigError>),
	/// TLS material is missing or unreadable.
	#[error("TLS file `{path}` cannot be loaded.")]
	Tls {
		/// Offending certificate or key path.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Outbound request could not be assembled.
	#[error("Outbound request is invalid: {reason}.")]
	InvalidRequest {
		/// Human-readable reason.
		reason: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Malformed or unexpected provider responses; the handshake must restart.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Provider answered with a non-2xx status.
	#[error("The {endpoint} endpoint returned HTTP {status}.")]
	UnexpectedStatus {
		/// Endpoint label.
		endpoint: &'static str,
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body: String,
	},
	/// Response body lacks a required parameter.
	#[error("The {endpoint} endpoint response is missing `{field}`.")]
	MissingField {
		/// Endpoint label.
		endpoint: &'static str,
		/// Missing parameter name.
		field: &'static str,
	},
	/// Provider did not confirm the callback URL.
	#[error("The request_token endpoint did not confirm the callback URL.")]
	CallbackNotConfirmed,
	/// Outbound call exceeded its deadline.
	#[error("Timed out while calling {url}.")]
	Timeout {
		/// Target URL, when known.
		url: String,
	},
}
impl ProtocolError {
	/// Builds an [`ProtocolError::UnexpectedStatus`] with a bounded body preview.
	pub fn unexpected_status(endpoint: &'static str, status: u16, body: &str) -> Self {
		let body = body.chars().take(BODY_PREVIEW_LEN).collect();

		Self::UnexpectedStatus { endpoint, status, body }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while serving or calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Unknown handshakes, or handshakes that have not reached the state a step requires.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum NotFoundError {
	/// No record exists for the request token.
	#[error("No handshake exists for request token `{request_token}`.")]
	UnknownToken {
		/// Request token supplied by the caller.
		request_token: String,
	},
	/// The callback has not recorded a verifier yet.
	#[error("Handshake `{request_token}` has no recorded verifier.")]
	MissingVerifier {
		/// Request token supplied by the caller.
		request_token: String,
	},
	/// The recorded verifier differs from the one supplied.
	#[error("Handshake `{request_token}` was verified with a different verifier.")]
	VerifierMismatch {
		/// Request token supplied by the caller.
		request_token: String,
	},
	/// The handshake already exchanged its request token.
	#[error("Handshake `{request_token}` has already been granted an access token.")]
	AlreadyGranted {
		/// Request token supplied by the caller.
		request_token: String,
	},
	/// The record has no access token to sign with.
	#[error("Handshake `{request_token}` has not been granted an access token.")]
	NotGranted {
		/// Request token supplied by the caller.
		request_token: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unexpected_status_truncates_body() {
		let body = "x".repeat(BODY_PREVIEW_LEN * 2);
		let ProtocolError::UnexpectedStatus { body, status, .. } =
			ProtocolError::unexpected_status("request_token", 401, &body)
		else {
			panic!("Constructor should build an UnexpectedStatus variant.");
		};

		assert_eq!(status, 401);
		assert_eq!(body.len(), BODY_PREVIEW_LEN);
	}

	#[test]
	fn not_found_class_is_detected() {
		let err: Error = NotFoundError::UnknownToken { request_token: "abc".into() }.into();

		assert!(err.is_not_found());
		assert_eq!(err.kind(), "not_found");
		assert!(err.to_string().contains("abc"));

		let err: Error = ProtocolError::CallbackNotConfirmed.into();

		assert!(!err.is_not_found());
		assert_eq!(err.kind(), "protocol");
	}
}
