//! Callback bookkeeping: record the provider's verifier.

// self
use crate::{
	_prelude::*,
	auth::HandshakeState,
	flows::{HandshakeCoordinator, common},
	http::ProviderHttpClient,
	obs::HandshakeStep,
	store::UpdateOutcome,
};

impl<C> HandshakeCoordinator<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Records `verifier` for a pending handshake.
	///
	/// Repeating the call with the same verifier is a no-op success. Unknown or already
	/// granted request tokens are not found.
	pub async fn record_verifier(
		&self,
		request_token: &str,
		verifier: &str,
	) -> Result<HandshakeState> {
		common::observe(HandshakeStep::Verifier, request_token, async move {
			match self.store.set_verifier(request_token, verifier).await? {
				UpdateOutcome::Updated => Ok(HandshakeState::Verified),
				UpdateOutcome::VerifierMismatch | UpdateOutcome::Missing =>
					Err(common::missing_error(self, request_token).await),
			}
		})
		.await
	}

	/// Reports where a handshake currently stands; unknown keys are [`HandshakeState::Init`].
	pub async fn handshake_state(&self, request_token: &str) -> Result<HandshakeState> {
		let record = self.store.fetch(request_token).await?;

		Ok(record.map_or(HandshakeState::Init, |record| record.state()))
	}
}
