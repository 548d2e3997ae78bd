//! Leg two: send the resource owner to the provider.

// self
use crate::{
	_prelude::*,
	auth::HandshakeState,
	error::NotFoundError,
	flows::{HandshakeCoordinator, common},
	http::ProviderHttpClient,
	obs::HandshakeStep,
};

/// Where to send the user, plus the state the handshake is reported in afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRedirect {
	/// Provider authorization URL carrying `oauth_token`.
	pub url: Url,
	/// Always [`HandshakeState::Authorized`].
	pub state: HandshakeState,
}

impl<C> HandshakeCoordinator<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Builds the provider authorization URL for a pending handshake.
	///
	/// Unknown or already granted request tokens are not found. Nothing is written.
	pub async fn present_authorization(
		&self,
		request_token: &str,
	) -> Result<AuthorizationRedirect> {
		common::observe(HandshakeStep::Authorize, request_token, async move {
			let record = common::fetch_known(self, request_token).await?;

			if !record.state().can_transition_to(HandshakeState::Authorized) {
				return Err(
					NotFoundError::AlreadyGranted { request_token: request_token.into() }.into()
				);
			}

			Ok(AuthorizationRedirect {
				url: self.endpoints.authorize_url(&record.request_token),
				state: HandshakeState::Authorized,
			})
		})
		.await
	}
}
