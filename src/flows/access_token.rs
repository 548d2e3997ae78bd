//! Leg three: exchange a verified request token for an access token.

// self
use crate::{
	_prelude::*,
	auth::{HandshakeState, TokenPair, TokenRecord},
	error::NotFoundError,
	flows::{HandshakeCoordinator, common},
	http::ProviderHttpClient,
	obs::HandshakeStep,
	store::UpdateOutcome,
};

impl<C> HandshakeCoordinator<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Exchanges a verified request token for the access token pair.
	///
	/// The recorded verifier must equal `verifier`; both checks happen before the provider
	/// is called. On success the record keeps its request-token key while its token
	/// columns now hold the access pair.
	pub async fn exchange_for_access_token(
		&self,
		request_token: &str,
		verifier: &str,
	) -> Result<TokenRecord> {
		common::observe(HandshakeStep::AccessToken, request_token, async move {
			let record = common::fetch_known(self, request_token).await?;
			let owned = || request_token.to_owned();

			if record.is_granted() {
				return Err(NotFoundError::AlreadyGranted { request_token: owned() }.into());
			}
			if record.verifier.is_none() {
				return Err(NotFoundError::MissingVerifier { request_token: owned() }.into());
			}
			if !record.verifier_matches(verifier) {
				return Err(NotFoundError::VerifierMismatch { request_token: owned() }.into());
			}

			debug_assert!(record.state().can_transition_to(HandshakeState::AccessGranted));

			let response = self.facade().fetch_access_token(request_token, verifier).await?;
			let access = TokenPair { key: response.token, secret: response.token_secret };

			match self.store.promote(request_token, verifier, access).await? {
				UpdateOutcome::Updated => common::fetch_known(self, request_token).await,
				UpdateOutcome::VerifierMismatch =>
					Err(NotFoundError::VerifierMismatch { request_token: owned() }.into()),
				UpdateOutcome::Missing => Err(common::missing_error(self, request_token).await),
			}
		})
		.await
	}

	/// Records the verifier and performs the exchange as one serialised step.
	///
	/// Concurrent callbacks for the same request token queue behind a per-token guard, so
	/// at most one of them reaches the provider.
	pub async fn complete_callback(
		&self,
		request_token: &str,
		verifier: &str,
	) -> Result<TokenRecord> {
		common::observe(HandshakeStep::Callback, request_token, async move {
			let lease = common::HandshakeLease::acquire(self, request_token);
			let _serialized = lease.lock().await;

			self.record_verifier(request_token, verifier).await?;
			self.exchange_for_access_token(request_token, verifier).await
		})
		.await
	}
}
