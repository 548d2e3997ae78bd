//! `oauth1-broker` server binary.

// self
use oauth1_broker::{config::BrokerConfig, obs, server};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let config = BrokerConfig::load()?;

	obs::init_subscriber(config.logging.format);
	tracing::info!(
		domain = %config.server.domain,
		provider = %config.provider.base_url,
		"Configuration loaded."
	);

	server::serve(config).await?;

	Ok(())
}
