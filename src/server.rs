//! TLS-terminated HTTP boundary for the handshake.
//!
//! [`router`] exposes the handshake routes over any [`ProviderHttpClient`] so tests can
//! drive it in-process. [`serve`] wires the production stack: SQLite store, reqwest
//! transport, rustls listener (HTTP/2 via ALPN), and graceful shutdown on Ctrl-C.

pub mod routes;

// std
use std::time::Duration as StdDuration;
// crates.io
use axum::{
	Router,
	routing::{get, post},
};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use tower_http::trace::TraceLayer;
// self
use crate::{
	_prelude::*,
	config::{BrokerConfig, TlsConfig},
	error::{ConfigError, TransportError},
	flows::HandshakeCoordinator,
	http::ProviderHttpClient,
	store::SqlStore,
};

const SHUTDOWN_GRACE: StdDuration = StdDuration::from_secs(10);

/// Shared state handed to every route.
pub struct AppState<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Handshake coordinator backing all routes.
	pub coordinator: Arc<HandshakeCoordinator<C>>,
}
impl<C> AppState<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Wraps a coordinator for use as router state.
	pub fn new(coordinator: HandshakeCoordinator<C>) -> Self {
		Self { coordinator: Arc::new(coordinator) }
	}
}
impl<C> Clone for AppState<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn clone(&self) -> Self {
		Self { coordinator: self.coordinator.clone() }
	}
}

/// Builds the handshake router with request tracing.
pub fn router<C>(state: AppState<C>) -> Router
where
	C: ?Sized + ProviderHttpClient,
{
	Router::new()
		.route("/auth/init", post(routes::init::<C>))
		.route("/auth/start", get(routes::start::<C>))
		.route("/auth/authorize", get(routes::authorize::<C>))
		.route("/auth/callback", get(routes::callback::<C>))
		.route("/health/db", get(routes::health_db::<C>))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// Runs the production server until Ctrl-C.
pub async fn serve(config: BrokerConfig) -> Result<()> {
	let tls = load_tls(&config.server.tls).await?;
	let addr = config.server.bind_address()?;
	let store = SqlStore::connect(&config.database.url, config.database.max_connections).await?;
	let coordinator = HandshakeCoordinator::new(&config, Arc::new(store))?;
	let app = router(AppState::new(coordinator));
	let handle = Handle::new();

	tokio::spawn(shutdown_on_ctrl_c(handle.clone()));
	tracing::info!(%addr, "App running on {}", config.server.public_url());

	axum_server::bind_rustls(addr, tls)
		.handle(handle)
		.serve(app.into_make_service())
		.await
		.map_err(TransportError::Io)?;

	tracing::info!("Server stopped.");

	Ok(())
}

async fn load_tls(tls: &TlsConfig) -> Result<RustlsConfig, ConfigError> {
	for path in [&tls.cert_path, &tls.key_path] {
		if let Err(source) = std::fs::metadata(path) {
			return Err(ConfigError::Tls { path: path.display().to_string(), source });
		}
	}

	RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
		.await
		.map_err(|source| ConfigError::Tls { path: tls.cert_path.display().to_string(), source })
}

async fn shutdown_on_ctrl_c(handle: Handle) {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %e, "Failed to listen for Ctrl-C.");

		return;
	}

	tracing::info!("Shutdown requested; draining connections.");
	handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn missing_tls_material_is_a_config_error() {
		let tls = TlsConfig {
			cert_path: "does/not/exist/fullchain.pem".into(),
			key_path: "does/not/exist/privkey.pem".into(),
		};
		let err = load_tls(&tls).await.expect_err("Missing certificate must be rejected.");

		assert!(matches!(err, ConfigError::Tls { ref path, .. } if path.ends_with("fullchain.pem")));
	}
}
