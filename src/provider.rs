//! Provider endpoint set for the three OAuth 1.0a legs.
//!
//! [`ProviderEndpoints`] carries the validated request-token, authorize, and access-token
//! URLs. Values come from [`ProviderEndpoints::from_base`] (the `<base>/oauth/*` layout
//! used by X/Twitter style providers) or from [`ProviderEndpointsBuilder`] when a
//! provider spreads its endpoints across hosts.

pub mod builder;

pub use builder::*;

// self
use crate::_prelude::*;

/// Default provider base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.x.com";

/// Validated endpoint set consumed by the handshake flows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Temporary-credential endpoint (leg one).
	pub request_token: Url,
	/// Resource-owner authorization page (leg two).
	pub authorize: Url,
	/// Token-credential endpoint (leg three).
	pub access_token: Url,
}
impl ProviderEndpoints {
	/// Creates a new builder with no endpoints set.
	pub fn builder() -> ProviderEndpointsBuilder {
		ProviderEndpointsBuilder::default()
	}

	/// Derives `<base>/oauth/{request_token,authorize,access_token}` from `base`.
	pub fn from_base(base: &Url) -> Result<Self, ProviderEndpointsError> {
		let mut base = base.clone();

		if base.cannot_be_a_base() {
			return Err(ProviderEndpointsError::InvalidBase { url: base.to_string() });
		}
		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());

			base.set_path(&path);
		}

		let join = |path: &str| {
			base.join(path)
				.map_err(|_| ProviderEndpointsError::InvalidBase { url: base.to_string() })
		};

		Self::builder()
			.request_token(join("oauth/request_token")?)
			.authorize(join("oauth/authorize")?)
			.access_token(join("oauth/access_token")?)
			.build()
	}

	/// Builds the user-facing authorization URL carrying `oauth_token`.
	pub fn authorize_url(&self, request_token: &str) -> Url {
		let mut url = self.authorize.clone();

		url.query_pairs_mut().append_pair("oauth_token", request_token);

		url
	}
}
