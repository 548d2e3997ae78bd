//! Three-legged OAuth 1.0a handshake broker.
//!
//! The crate signs provider calls with HMAC-SHA1 ([`oauth::Signer`]), drives the
//! request-token / authorize / access-token legs through [`flows::HandshakeCoordinator`],
//! persists each handshake as a single [`auth::TokenRecord`] keyed by its request token
//! ([`store`]), and serves the callback routes over rustls with the `server` feature.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod ext;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
#[cfg(feature = "server")] pub mod server;
pub mod store;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(feature = "server")] use color_eyre as _;
#[cfg(test)] use {color_eyre as _, httpmock as _, serde_json as _, tokio as _, tower as _};
