//! Transport primitives for signed provider calls.
//!
//! The module exposes [`ProviderHttpClient`] so downstream crates can plug in custom
//! HTTP stacks. Implementations receive a fully signed [`SignedRequest`] and only need to
//! put it on the wire and hand back the status code and body.

// self
use crate::{_prelude::*, oauth::SignedRequest};

/// Boxed future returned by [`ProviderHttpClient::execute`].
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Status and body returned by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderResponse {
	/// HTTP status code.
	pub status: u16,
	/// Decoded response body.
	pub body: String,
}
impl ProviderResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP transports capable of sending signed OAuth 1.0a requests.
///
/// The trait is the broker's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so they can be shared behind `Arc` across request tasks, and
/// the returned future must be `Send` so coordinator futures can hop executors. Transport
/// failures are reported through [`Error`]; non-2xx statuses are *not* errors here and are
/// classified by the caller.
pub trait ProviderHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves with the provider's status and body.
	fn execute<'a>(&'a self, request: &'a SignedRequest) -> HttpFuture<'a, ProviderResponse>;
}

#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
mod reqwest_client {
	// std
	use std::ops::Deref;
	// crates.io
	use reqwest::{
		Method,
		header::{AUTHORIZATION, CONTENT_TYPE},
	};
	// self
	use super::*;
	use crate::error::{ConfigError, ProtocolError, TransportError};

	const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

	/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
	///
	/// OAuth 1.0a token endpoints answer directly, so custom clients should disable
	/// redirect following and carry a request timeout.
	#[derive(Clone, Debug, Default)]
	pub struct ReqwestHttpClient(pub ReqwestClient);
	impl ReqwestHttpClient {
		/// Wraps an existing reqwest [`ReqwestClient`].
		pub fn with_client(client: ReqwestClient) -> Self {
			Self(client)
		}

		/// Builds a client with the given per-request timeout and no redirect following.
		pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, ConfigError> {
			let client = ReqwestClient::builder()
				.timeout(timeout)
				.redirect(reqwest::redirect::Policy::none())
				.build()?;

			Ok(Self(client))
		}
	}
	impl AsRef<ReqwestClient> for ReqwestHttpClient {
		fn as_ref(&self) -> &ReqwestClient {
			&self.0
		}
	}
	impl Deref for ReqwestHttpClient {
		type Target = ReqwestClient;

		fn deref(&self) -> &Self::Target {
			&self.0
		}
	}
	impl ProviderHttpClient for ReqwestHttpClient {
		fn execute<'a>(&'a self, request: &'a SignedRequest) -> HttpFuture<'a, ProviderResponse> {
			Box::pin(async move {
				let method = Method::from_bytes(request.method.as_bytes()).map_err(|e| {
					ConfigError::InvalidRequest { reason: format!("bad method: {e}") }
				})?;
				let mut builder = self
					.0
					.request(method, request.url.clone())
					.header(AUTHORIZATION, &request.authorization);

				if !request.form.is_empty() {
					builder =
						builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE).body(request.form_body());
				}

				let response = builder.send().await.map_err(map_reqwest_error)?;
				let status = response.status().as_u16();
				let body = response.text().await.map_err(map_reqwest_error)?;

				Ok(ProviderResponse { status, body })
			})
		}
	}

	fn map_reqwest_error(e: ReqwestError) -> Error {
		if e.is_timeout() {
			let url = e.url().map(ToString::to_string).unwrap_or_default();

			return ProtocolError::Timeout { url }.into();
		}
		if e.is_builder() {
			return ConfigError::from(e).into();
		}

		TransportError::from(e).into()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn success_covers_2xx_only() {
		let ok = ProviderResponse { status: 204, body: String::new() };
		let redirect = ProviderResponse { status: 302, body: String::new() };
		let denied = ProviderResponse { status: 401, body: String::new() };

		assert!(ok.is_success());
		assert!(!redirect.is_success());
		assert!(!denied.is_success());
	}
}
