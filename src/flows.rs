//! Handshake orchestration for the three OAuth 1.0a legs.

pub mod access_token;
pub mod authorize;
mod common;
pub mod request_token;
pub mod verifier;

pub use authorize::AuthorizationRedirect;

// self
use crate::{
	_prelude::*,
	auth::ConsumerCredentials,
	config::BrokerConfig,
	error::ConfigError,
	http::ProviderHttpClient,
	oauth::{ProviderFacade, Signer},
	provider::ProviderEndpoints,
	store::HandshakeStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Coordinator specialized for the crate's default reqwest transport.
pub type ReqwestCoordinator = HandshakeCoordinator<ReqwestHttpClient>;

/// Drives handshakes against a single provider.
///
/// The coordinator owns the HTTP client, token store, signer, and endpoint set so each
/// step can focus on its own leg of the protocol. Steps are sequential awaited calls;
/// nothing is retried. A per-request-token guard serialises the callback step so
/// duplicate callbacks for one token cannot race each other to the provider.
pub struct HandshakeCoordinator<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// HTTP client used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Store that persists handshake records.
	pub store: Arc<dyn HandshakeStore>,
	/// Provider endpoints.
	pub endpoints: ProviderEndpoints,
	/// Callback URL sent as `oauth_callback`.
	pub callback_url: Url,
	signer: Signer,
	handshake_guards: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}
impl<C> HandshakeCoordinator<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Creates a coordinator that reuses the caller-provided transport.
	pub fn with_http_client(
		store: Arc<dyn HandshakeStore>,
		endpoints: ProviderEndpoints,
		consumer: ConsumerCredentials,
		callback_url: Url,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self, ConfigError> {
		Ok(Self {
			http_client: http_client.into(),
			store,
			endpoints,
			callback_url,
			signer: Signer::new(consumer)?,
			handshake_guards: Default::default(),
		})
	}

	/// Creates a coordinator from validated configuration and a caller-provided transport.
	pub fn from_config(
		config: &BrokerConfig,
		store: Arc<dyn HandshakeStore>,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self, ConfigError> {
		Self::with_http_client(
			store,
			config.provider.endpoints.clone(),
			config.consumer.clone(),
			config.callback_url.clone(),
			http_client,
		)
	}

	/// Signer bound to the configured consumer.
	pub fn signer(&self) -> &Signer {
		&self.signer
	}

	pub(crate) fn facade(&self) -> ProviderFacade<'_, C> {
		ProviderFacade {
			http_client: self.http_client.as_ref(),
			signer: &self.signer,
			endpoints: &self.endpoints,
		}
	}
}
#[cfg(feature = "reqwest")]
impl HandshakeCoordinator<ReqwestHttpClient> {
	/// Creates a coordinator with its own reqwest transport honoring `provider.timeout_secs`.
	pub fn new(config: &BrokerConfig, store: Arc<dyn HandshakeStore>) -> Result<Self, ConfigError> {
		let http_client = ReqwestHttpClient::with_timeout(config.provider.timeout)?;

		Self::from_config(config, store, http_client)
	}
}
impl<C> Debug for HandshakeCoordinator<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HandshakeCoordinator")
			.field("endpoints", &self.endpoints)
			.field("callback_url", &self.callback_url.as_str())
			.field("consumer_key", &self.signer.consumer_key())
			.finish()
	}
}
