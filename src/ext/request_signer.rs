//! Request signing contracts that let downstream crates sign API calls with a granted
//! access token.

// self
use crate::auth::TokenRecord;

/// Describes how to attach a [`TokenRecord`]'s access token to an outbound request without
/// constraining the HTTP client type.
pub trait RequestSignerExt<Request, Error>
where
	Self: Send + Sync,
{
	/// Consumes the provided request and injects an OAuth 1.0a `Authorization` header
	/// signed with the record's access token.
	fn attach_token(&self, request: Request, record: &TokenRecord) -> Result<Request, Error>;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
	// crates.io
	use reqwest::{
		Request,
		header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue},
	};
	use url::form_urlencoded;
	// self
	use super::*;
	use crate::{
		_prelude::*,
		error::{ConfigError, NotFoundError},
		oauth::Signer,
	};

	impl RequestSignerExt<Request, Error> for Signer {
		fn attach_token(&self, mut request: Request, record: &TokenRecord) -> Result<Request> {
			if !record.is_granted() {
				return Err(NotFoundError::NotGranted {
					request_token: record.request_token.clone(),
				}
				.into());
			}

			let params = form_params(&request);
			let signed =
				self.sign(request.method().as_str(), request.url(), &params, &record.token_pair())?;
			let value = HeaderValue::from_str(&signed.authorization)
				.map_err(|e| ConfigError::InvalidRequest { reason: e.to_string() })?;

			request.headers_mut().insert(AUTHORIZATION, value);

			Ok(request)
		}
	}

	// URL-encoded bodies are part of the signature base string.
	fn form_params(request: &Request) -> Vec<(String, String)> {
		let is_form = request
			.headers()
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

		match request.body().and_then(|body| body.as_bytes()) {
			Some(bytes) if is_form => form_urlencoded::parse(bytes).into_owned().collect(),
			_ => Vec::new(),
		}
	}

}
