//! Validated construction of [`ProviderEndpoints`](crate::provider::ProviderEndpoints).

// self
use crate::{_prelude::*, provider::ProviderEndpoints};

/// Errors raised while constructing or validating provider endpoints.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderEndpointsError {
	/// Request-token endpoint is mandatory.
	#[error("Missing request_token endpoint.")]
	MissingRequestTokenEndpoint,
	/// Authorization endpoint is mandatory.
	#[error("Missing authorize endpoint.")]
	MissingAuthorizeEndpoint,
	/// Access-token endpoint is mandatory.
	#[error("Missing access_token endpoint.")]
	MissingAccessTokenEndpoint,
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Base URL cannot carry the `oauth/*` paths.
	#[error("Provider base URL `{url}` cannot be used as a base.")]
	InvalidBase {
		/// Base URL that failed validation.
		url: String,
	},
}

/// Builder for [`ProviderEndpoints`] values.
#[derive(Debug, Default)]
pub struct ProviderEndpointsBuilder {
	/// Temporary-credential endpoint.
	pub request_token: Option<Url>,
	/// Authorization page.
	pub authorize: Option<Url>,
	/// Token-credential endpoint.
	pub access_token: Option<Url>,
}
impl ProviderEndpointsBuilder {
	/// Sets the request-token endpoint.
	pub fn request_token(mut self, url: Url) -> Self {
		self.request_token = Some(url);

		self
	}

	/// Sets the authorization page.
	pub fn authorize(mut self, url: Url) -> Self {
		self.authorize = Some(url);

		self
	}

	/// Sets the access-token endpoint.
	pub fn access_token(mut self, url: Url) -> Self {
		self.access_token = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting endpoint set.
	pub fn build(self) -> Result<ProviderEndpoints, ProviderEndpointsError> {
		let request_token =
			self.request_token.ok_or(ProviderEndpointsError::MissingRequestTokenEndpoint)?;
		let authorize = self.authorize.ok_or(ProviderEndpointsError::MissingAuthorizeEndpoint)?;
		let access_token =
			self.access_token.ok_or(ProviderEndpointsError::MissingAccessTokenEndpoint)?;
		let endpoints = ProviderEndpoints { request_token, authorize, access_token };

		endpoints.validate()?;

		Ok(endpoints)
	}
}

impl ProviderEndpoints {
	fn validate(&self) -> Result<(), ProviderEndpointsError> {
		validate_endpoint("request_token", &self.request_token)?;
		validate_endpoint("authorize", &self.authorize)?;
		validate_endpoint("access_token", &self.access_token)?;

		Ok(())
	}
}

// Loopback hosts may use plain HTTP so local mock providers stay usable.
fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderEndpointsError> {
	let loopback = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));

	if url.scheme() == "https" || (url.scheme() == "http" && loopback) {
		Ok(())
	} else {
		Err(ProviderEndpointsError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(raw: &str) -> Url {
		Url::parse(raw).expect("Fixture URL should parse.")
	}

	#[test]
	fn missing_endpoint_is_reported() {
		let err = ProviderEndpoints::builder()
			.request_token(url("https://p.example/oauth/request_token"))
			.access_token(url("https://p.example/oauth/access_token"))
			.build()
			.expect_err("Builder must require the authorize endpoint.");

		assert_eq!(err, ProviderEndpointsError::MissingAuthorizeEndpoint);
	}

	#[test]
	fn loopback_http_is_allowed() {
		let endpoints = ProviderEndpoints::builder()
			.request_token(url("http://127.0.0.1:9000/oauth/request_token"))
			.authorize(url("http://localhost:9000/oauth/authorize"))
			.access_token(url("http://127.0.0.1:9000/oauth/access_token"))
			.build()
			.expect("Loopback endpoints should be accepted.");

		assert_eq!(endpoints.authorize.host_str(), Some("localhost"));
	}

	#[test]
	fn remote_http_is_rejected() {
		let err = ProviderEndpoints::builder()
			.request_token(url("https://p.example/oauth/request_token"))
			.authorize(url("https://p.example/oauth/authorize"))
			.access_token(url("http://p.example/oauth/access_token"))
			.build()
			.expect_err("Remote plain HTTP must be rejected.");

		assert!(matches!(
			err,
			ProviderEndpointsError::InsecureEndpoint { endpoint: "access_token", .. }
		));
	}
}
