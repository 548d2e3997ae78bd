//! Leg one: obtain and persist a request token.

// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	flows::{HandshakeCoordinator, common},
	http::ProviderHttpClient,
	obs::HandshakeStep,
};

impl<C> HandshakeCoordinator<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Requests a fresh request token and stores it as a new handshake.
	///
	/// The provider must answer 2xx with `oauth_token` and `oauth_token_secret`; an explicit
	/// `oauth_callback_confirmed=false` is rejected. The returned record is in the
	/// `Requested` state.
	pub async fn request_token(&self) -> Result<TokenRecord> {
		common::observe(HandshakeStep::RequestToken, "", async move {
			let response = self.facade().fetch_request_token(&self.callback_url).await?;
			let record = TokenRecord::requested(response.token, response.token_secret.expose());

			self.store.create(record.clone()).await?;

			Ok(record)
		})
		.await
	}
}
