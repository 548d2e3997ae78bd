//! OAuth 1.0a client facade: sign, send, and parse provider token calls.

pub mod response;
pub mod signer;

pub use response::*;
pub use signer::*;

// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	error::ProtocolError,
	http::ProviderHttpClient,
	provider::ProviderEndpoints,
};

const REQUEST_TOKEN_ENDPOINT: &str = "request_token";
const ACCESS_TOKEN_ENDPOINT: &str = "access_token";

/// Signs and sends the two token-issuing calls of the handshake.
pub(crate) struct ProviderFacade<'a, C>
where
	C: ?Sized + ProviderHttpClient,
{
	pub(crate) http_client: &'a C,
	pub(crate) signer: &'a Signer,
	pub(crate) endpoints: &'a ProviderEndpoints,
}
impl<C> ProviderFacade<'_, C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Leg one: `POST request_token` with `oauth_callback` and no token.
	pub(crate) async fn fetch_request_token(&self, callback_url: &Url) -> Result<TokenResponse> {
		let params = [("oauth_callback".to_owned(), callback_url.to_string())];
		let request = self.signer.sign(
			"POST",
			&self.endpoints.request_token,
			&params,
			&TokenPair::empty(),
		)?;
		let body = self.send(REQUEST_TOKEN_ENDPOINT, &request).await?;
		let parsed = parse_token_response(REQUEST_TOKEN_ENDPOINT, &body)?;

		if parsed.callback_confirmed == Some(false) {
			return Err(ProtocolError::CallbackNotConfirmed.into());
		}

		Ok(parsed)
	}

	/// Leg three: `POST access_token` signed with the request token and the verifier.
	pub(crate) async fn fetch_access_token(
		&self,
		request_token: &str,
		verifier: &str,
	) -> Result<TokenResponse> {
		let params = [
			("oauth_token".to_owned(), request_token.to_owned()),
			("oauth_verifier".to_owned(), verifier.to_owned()),
		];
		let request = self.signer.sign(
			"POST",
			&self.endpoints.access_token,
			&params,
			&TokenPair::unsecured(request_token),
		)?;
		let body = self.send(ACCESS_TOKEN_ENDPOINT, &request).await?;

		Ok(parse_token_response(ACCESS_TOKEN_ENDPOINT, &body)?)
	}

	async fn send(&self, endpoint: &'static str, request: &SignedRequest) -> Result<String> {
		let response = self.http_client.execute(request).await?;

		if !response.is_success() {
			return Err(
				ProtocolError::unexpected_status(endpoint, response.status, &response.body).into()
			);
		}

		Ok(response.body)
	}
}
