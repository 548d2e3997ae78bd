// crates.io
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
// self
use crate::config::LogFormat;

const DEFAULT_FILTER: &str = "oauth1_broker=info,tower_http=info";

/// Installs the global subscriber: `RUST_LOG` (or the default filter) plus pretty or JSON output.
///
/// Calling it twice is harmless; the second install is ignored.
pub fn init_subscriber(format: LogFormat) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
	let registry = tracing_subscriber::registry().with(filter);
	let result = match format {
		LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
		LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).try_init(),
	};

	if result.is_err() {
		tracing::debug!("Global tracing subscriber already installed.");
	}
}
