//! URL-encoded token responses returned by the request-token and access-token endpoints.

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ProtocolError};

/// Token pair parsed from a provider response body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenResponse {
	/// `oauth_token` value.
	pub token: String,
	/// `oauth_token_secret` value.
	pub token_secret: TokenSecret,
	/// `oauth_callback_confirmed` flag, when the provider sent one.
	pub callback_confirmed: Option<bool>,
}

/// Parses `oauth_token=..&oauth_token_secret=..` from `body`.
///
/// Unknown parameters (e.g. `user_id`, `screen_name`) are ignored. Empty values count as
/// missing.
pub fn parse_token_response(
	endpoint: &'static str,
	body: &str,
) -> Result<TokenResponse, ProtocolError> {
	let mut token = None;
	let mut secret = None;
	let mut callback_confirmed = None;

	for (k, v) in form_urlencoded::parse(body.trim().as_bytes()) {
		match k.as_ref() {
			"oauth_token" if !v.is_empty() => token = Some(v.into_owned()),
			"oauth_token_secret" if !v.is_empty() => secret = Some(v.into_owned()),
			"oauth_callback_confirmed" => callback_confirmed = Some(v == "true"),
			_ => (),
		}
	}

	let token = token.ok_or(ProtocolError::MissingField { endpoint, field: "oauth_token" })?;
	let secret =
		secret.ok_or(ProtocolError::MissingField { endpoint, field: "oauth_token_secret" })?;

	Ok(TokenResponse { token, token_secret: TokenSecret::new(secret), callback_confirmed })
}
