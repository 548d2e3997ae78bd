//! Layered broker configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults ([`BrokerConfig::defaults`]).
//! 2. The flat deployment file `server.json`, if present. Only `port` (mapped to
//!    `server.port`) and `database` (mapped to the SQLite file `<database>.db`) are read;
//!    its PostgreSQL connection keys (`host`, `peer`, `username`, `password`) are ignored.
//! 3. `config/default.*` in the working directory, if present.
//! 4. `OAUTH1_BROKER__*` environment variables (`__` separates sections, e.g.
//!    `OAUTH1_BROKER__SERVER__PORT`).
//! 5. The bare deployment variables `CONSUMER_KEY`, `CONSUMER_SECRET`, `CALLBACK_URL`, and
//!    `CERTIFICATE_URL` (the public server domain).
//!
//! The merged tree is validated once into an immutable [`BrokerConfig`].

// std
use std::{
	net::{SocketAddr, ToSocketAddrs},
	path::{Path, PathBuf},
	time::Duration as StdDuration,
};
// crates.io
use ::config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
// self
use crate::{
	_prelude::*,
	auth::ConsumerCredentials,
	error::ConfigError,
	provider::{DEFAULT_BASE_URL, ProviderEndpoints},
};

const ENV_PREFIX: &str = "OAUTH1_BROKER";
const LEGACY_FILE: &str = "server.json";
const LEGACY_ENV: [(&str, &str); 4] = [
	("CONSUMER_KEY", "consumer.key"),
	("CONSUMER_SECRET", "consumer.secret"),
	("CALLBACK_URL", "callback_url"),
	("CERTIFICATE_URL", "server.domain"),
];

/// Log output format for the server binary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	/// Human-readable multi-line output.
	#[default]
	Pretty,
	/// One JSON object per event.
	Json,
}

/// Validated broker configuration, built once at startup.
#[derive(Clone, Debug)]
pub struct BrokerConfig {
	/// Consumer credentials used by the signer.
	pub consumer: ConsumerCredentials,
	/// Callback URL registered with the provider.
	pub callback_url: Url,
	/// Outbound provider settings.
	pub provider: ProviderConfig,
	/// Inbound server settings.
	pub server: ServerConfig,
	/// Token store settings.
	pub database: DatabaseConfig,
	/// Log output settings.
	pub logging: LoggingConfig,
}
impl BrokerConfig {
	/// Loads and validates configuration from every source.
	pub fn load() -> Result<Self, ConfigError> {
		let mut builder = Self::with_legacy_file(Self::defaults()?, Path::new(LEGACY_FILE))?
			.add_source(File::with_name("config/default").required(false))
			.add_source(Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true));

		for (var, key) in LEGACY_ENV {
			builder = builder.set_override_option(key, std::env::var(var).ok())?;
		}

		Self::from_config(builder.build()?)
	}

	/// Builder seeded with every default value.
	pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
		Ok(Config::builder()
			.set_default("provider.base_url", DEFAULT_BASE_URL)?
			.set_default("provider.timeout_secs", 30)?
			.set_default("server.host", "0.0.0.0")?
			.set_default("server.port", 3000)?
			.set_default("server.tls.cert_path", "ssl/fullchain.pem")?
			.set_default("server.tls.key_path", "ssl/privkey.pem")?
			.set_default("database.url", "sqlite://oauth1-broker.db?mode=rwc")?
			.set_default("database.max_connections", 5)?
			.set_default("logging.format", "pretty")?)
	}

	/// Folds the flat `server.json` keys into `builder` as defaults.
	///
	/// A missing file leaves `builder` untouched.
	pub fn with_legacy_file(
		mut builder: ConfigBuilder<DefaultState>,
		path: &Path,
	) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
		let raw = Config::builder().add_source(File::from(path).required(false)).build()?;
		let legacy: LegacyServerFile = serde_path_to_error::deserialize(raw)?;

		if let Some(port) = legacy.port {
			builder = builder.set_default("server.port", i64::from(port))?;
		}
		if let Some(database) = legacy.database.filter(|name| !name.trim().is_empty()) {
			let url = format!("sqlite://{}.db?mode=rwc", database.trim());

			builder = builder.set_default("database.url", url)?;
		}

		Ok(builder)
	}

	/// Validates an already merged configuration tree.
	pub fn from_config(config: Config) -> Result<Self, ConfigError> {
		let raw: RawConfig = serde_path_to_error::deserialize(config)?;

		raw.validate()
	}
}

/// Outbound provider settings.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
	/// Provider base URL.
	pub base_url: Url,
	/// Endpoints derived from [`Self::base_url`].
	pub endpoints: ProviderEndpoints,
	/// Per-request timeout for provider calls.
	pub timeout: StdDuration,
}

/// Inbound HTTPS server settings.
#[derive(Clone, Debug)]
pub struct ServerConfig {
	/// Interface to bind.
	pub host: String,
	/// Port to bind.
	pub port: u16,
	/// Public domain the certificate was issued for.
	pub domain: String,
	/// Certificate material.
	pub tls: TlsConfig,
}
impl ServerConfig {
	/// Resolves the bind address.
	pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
		let address = format!("{}:{}", self.host, self.port);

		address
			.to_socket_addrs()
			.ok()
			.and_then(|mut addrs| addrs.next())
			.ok_or(ConfigError::InvalidBindAddress { address })
	}

	/// Public base URL announced in logs.
	pub fn public_url(&self) -> String {
		format!("https://{}:{}", self.domain, self.port)
	}
}

/// PEM certificate chain and private key paths.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TlsConfig {
	/// Certificate chain.
	pub cert_path: PathBuf,
	/// Private key.
	pub key_path: PathBuf,
}

/// Token store settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
	/// sqlx connection URL.
	pub url: String,
	/// Pool size.
	pub max_connections: u32,
}

/// Log output settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
	/// Output format.
	pub format: LogFormat,
}

#[derive(Deserialize)]
struct RawConfig {
	#[serde(default)]
	consumer: RawConsumer,
	callback_url: Option<String>,
	provider: RawProvider,
	server: RawServer,
	database: DatabaseConfig,
	logging: LoggingConfig,
}
impl RawConfig {
	fn validate(self) -> Result<BrokerConfig, ConfigError> {
		let consumer = ConsumerCredentials::new(
			self.consumer.key.unwrap_or_default(),
			self.consumer.secret.unwrap_or_default(),
		);

		if !consumer.is_complete() {
			return Err(ConfigError::MissingConsumerCredentials);
		}

		let callback_url = parse_url("callback_url", self.callback_url)?;
		let base_url = parse_url("provider.base_url", Some(self.provider.base_url))?;
		let endpoints = ProviderEndpoints::from_base(&base_url)?;

		if self.provider.timeout_secs == 0 {
			return Err(ConfigError::InvalidTimeout);
		}

		let domain = self
			.server
			.domain
			.filter(|domain| !domain.trim().is_empty())
			.ok_or(ConfigError::MissingSetting { key: "server.domain" })?;

		Ok(BrokerConfig {
			consumer,
			callback_url,
			provider: ProviderConfig {
				base_url,
				endpoints,
				timeout: StdDuration::from_secs(self.provider.timeout_secs),
			},
			server: ServerConfig {
				host: self.server.host,
				port: self.server.port,
				domain,
				tls: self.server.tls,
			},
			database: self.database,
			logging: self.logging,
		})
	}
}

// Unknown keys are ignored.
#[derive(Default, Deserialize)]
struct LegacyServerFile {
	port: Option<u16>,
	database: Option<String>,
}

#[derive(Default, Deserialize)]
struct RawConsumer {
	key: Option<String>,
	secret: Option<String>,
}

#[derive(Deserialize)]
struct RawProvider {
	base_url: String,
	timeout_secs: u64,
}

#[derive(Deserialize)]
struct RawServer {
	host: String,
	port: u16,
	domain: Option<String>,
	tls: TlsConfig,
}

fn parse_url(key: &'static str, value: Option<String>) -> Result<Url, ConfigError> {
	let value = value
		.filter(|value| !value.trim().is_empty())
		.ok_or(ConfigError::MissingSetting { key })?;

	Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl { key, source })
}
