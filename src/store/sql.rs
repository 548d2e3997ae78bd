//! SQLite-backed [`HandshakeStore`] built on a sqlx connection pool.
//!
//! One table, `tokens`, keyed by the immutable request token. The token columns are
//! overwritten in place when the handshake is promoted. Timestamps are unix seconds.

// crates.io
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenRecord, TokenSecret},
	store::{HandshakeStore, StoreError, StoreFuture, UpdateOutcome},
};

type TokenRow = (String, String, String, Option<String>, i64, i64, Option<i64>);

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tokens (
	request_token      TEXT PRIMARY KEY NOT NULL,
	oauth_token        TEXT NOT NULL,
	oauth_token_secret TEXT NOT NULL,
	oauth_verifier     TEXT NULL,
	created_at         INTEGER NOT NULL,
	updated_at         INTEGER NOT NULL,
	granted_at         INTEGER NULL
)
"#;
const SELECT_RECORD: &str = r#"
SELECT request_token, oauth_token, oauth_token_secret, oauth_verifier,
	created_at, updated_at, granted_at
FROM tokens
WHERE request_token = ?
"#;

/// Pool-backed store for production deployments.
#[derive(Clone, Debug)]
pub struct SqlStore {
	pool: SqlitePool,
}
impl SqlStore {
	/// Connects to `url` and ensures the `tokens` table exists.
	pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
		let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;

		Self::from_pool(pool).await
	}

	/// Opens a private in-memory database.
	///
	/// The pool is pinned to a single connection that never expires; every new SQLite
	/// memory connection would otherwise see an empty database.
	pub async fn in_memory() -> Result<Self, StoreError> {
		let pool = SqlitePoolOptions::new()
			.max_connections(1)
			.idle_timeout(None)
			.max_lifetime(None)
			.connect("sqlite::memory:")
			.await?;

		Self::from_pool(pool).await
	}

	/// Wraps an existing pool and ensures the schema.
	pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
		let store = Self { pool };

		store.ensure_schema().await?;

		Ok(store)
	}

	/// Creates the `tokens` table if it is missing.
	pub async fn ensure_schema(&self) -> Result<(), StoreError> {
		sqlx::query(SCHEMA).execute(&self.pool).await?;

		Ok(())
	}

	/// Underlying pool.
	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	async fn create_now(&self, record: TokenRecord) -> Result<(), StoreError> {
		sqlx::query(
			r#"
			INSERT INTO tokens (
				request_token, oauth_token, oauth_token_secret, oauth_verifier,
				created_at, updated_at, granted_at
			)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(&record.request_token)
		.bind(&record.token)
		.bind(record.token_secret.expose())
		.bind(&record.verifier)
		.bind(record.created_at.unix_timestamp())
		.bind(record.updated_at.unix_timestamp())
		.bind(record.granted_at.map(OffsetDateTime::unix_timestamp))
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	async fn fetch_now(&self, request_token: &str) -> Result<Option<TokenRecord>, StoreError> {
		let row = sqlx::query_as::<_, TokenRow>(SELECT_RECORD)
			.bind(request_token)
			.fetch_optional(&self.pool)
			.await?;

		row.map(record_from_row).transpose()
	}

	async fn set_verifier_now(
		&self,
		request_token: &str,
		verifier: &str,
	) -> Result<UpdateOutcome, StoreError> {
		let result = sqlx::query(
			r#"
			UPDATE tokens
			SET oauth_verifier = ?, updated_at = ?
			WHERE request_token = ? AND granted_at IS NULL
			"#,
		)
		.bind(verifier)
		.bind(OffsetDateTime::now_utc().unix_timestamp())
		.bind(request_token)
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 1 {
			Ok(UpdateOutcome::Updated)
		} else {
			Ok(UpdateOutcome::Missing)
		}
	}

	async fn promote_now(
		&self,
		request_token: &str,
		expected_verifier: &str,
		access: TokenPair,
	) -> Result<UpdateOutcome, StoreError> {
		let now = OffsetDateTime::now_utc().unix_timestamp();
		let result = sqlx::query(
			r#"
			UPDATE tokens
			SET oauth_token = ?, oauth_token_secret = ?, updated_at = ?, granted_at = ?
			WHERE request_token = ? AND oauth_verifier = ? AND granted_at IS NULL
			"#,
		)
		.bind(&access.key)
		.bind(access.secret.expose())
		.bind(now)
		.bind(now)
		.bind(request_token)
		.bind(expected_verifier)
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 1 {
			return Ok(UpdateOutcome::Updated);
		}

		// Zero rows: tell an unknown or granted key apart from a verifier mismatch.
		let granted = sqlx::query_as::<_, (Option<i64>,)>(
			"SELECT granted_at FROM tokens WHERE request_token = ?",
		)
		.bind(request_token)
		.fetch_optional(&self.pool)
		.await?;

		Ok(match granted {
			Some((None,)) => UpdateOutcome::VerifierMismatch,
			_ => UpdateOutcome::Missing,
		})
	}

	async fn ping_now(&self) -> Result<OffsetDateTime, StoreError> {
		let (now,) = sqlx::query_as::<_, (i64,)>("SELECT CAST(strftime('%s', 'now') AS INTEGER)")
			.fetch_one(&self.pool)
			.await?;

		timestamp(now)
	}
}
impl HandshakeStore for SqlStore {
	fn create(&self, record: TokenRecord) -> StoreFuture<'_, ()> {
		Box::pin(self.create_now(record))
	}

	fn fetch<'a>(&'a self, request_token: &'a str) -> StoreFuture<'a, Option<TokenRecord>> {
		Box::pin(self.fetch_now(request_token))
	}

	fn set_verifier<'a>(
		&'a self,
		request_token: &'a str,
		verifier: &'a str,
	) -> StoreFuture<'a, UpdateOutcome> {
		Box::pin(self.set_verifier_now(request_token, verifier))
	}

	fn promote<'a>(
		&'a self,
		request_token: &'a str,
		expected_verifier: &'a str,
		access: TokenPair,
	) -> StoreFuture<'a, UpdateOutcome> {
		Box::pin(self.promote_now(request_token, expected_verifier, access))
	}

	fn ping(&self) -> StoreFuture<'_, OffsetDateTime> {
		Box::pin(self.ping_now())
	}
}

impl From<sqlx::Error> for StoreError {
	fn from(e: sqlx::Error) -> Self {
		match &e {
			sqlx::Error::Database(db) if db.is_unique_violation() => Self::Duplicate,
			sqlx::Error::ColumnDecode { .. }
			| sqlx::Error::Decode(_)
			| sqlx::Error::TypeNotFound { .. } => Self::Serialization { message: e.to_string() },
			_ => Self::Backend { message: e.to_string() },
		}
	}
}

fn record_from_row(row: TokenRow) -> Result<TokenRecord, StoreError> {
	let (request_token, token, secret, verifier, created_at, updated_at, granted_at) = row;

	Ok(TokenRecord {
		request_token,
		token,
		token_secret: TokenSecret::new(secret),
		verifier,
		created_at: timestamp(created_at)?,
		updated_at: timestamp(updated_at)?,
		granted_at: granted_at.map(timestamp).transpose()?,
	})
}

fn timestamp(secs: i64) -> Result<OffsetDateTime, StoreError> {
	OffsetDateTime::from_unix_timestamp(secs)
		.map_err(|e| StoreError::Serialization { message: e.to_string() })
}
