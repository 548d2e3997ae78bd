#![allow(dead_code)]

// std
use std::{sync::Arc, time::Duration};
// crates.io
use httpmock::prelude::*;
// self
use oauth1_broker::{
	auth::ConsumerCredentials,
	flows::ReqwestCoordinator,
	http::ReqwestHttpClient,
	provider::ProviderEndpoints,
	reqwest::Client,
	store::{HandshakeStore, MemoryStore},
	url::Url,
};

pub const CONSUMER_KEY: &str = "consumer-key";
pub const CONSUMER_SECRET: &str = "consumer-secret";
pub const CALLBACK_URL: &str = "https://broker.example.com/auth/callback";
pub const REQUEST_TOKEN_PATH: &str = "/oauth/request_token";
pub const AUTHORIZE_PATH: &str = "/oauth/authorize";
pub const ACCESS_TOKEN_PATH: &str = "/oauth/access_token";

pub fn url(value: &str) -> Url {
	Url::parse(value).expect("Failed to parse test URL.")
}

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
/// `httpmock`.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Same as [`test_reqwest_http_client`] with a per-request timeout.
pub fn test_reqwest_http_client_with_timeout(timeout: Duration) -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.timeout(timeout)
		.build()
		.expect("Failed to build insecure reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Endpoints pointing at the mock provider.
pub fn endpoints(server: &MockServer) -> ProviderEndpoints {
	ProviderEndpoints::builder()
		.request_token(url(&server.url(REQUEST_TOKEN_PATH)))
		.authorize(url(&server.url(AUTHORIZE_PATH)))
		.access_token(url(&server.url(ACCESS_TOKEN_PATH)))
		.build()
		.expect("Loopback mock endpoints should be accepted.")
}

/// Coordinator over the mock provider, backed by the given store.
pub fn coordinator_with_store(
	server: &MockServer,
	store: Arc<dyn HandshakeStore>,
) -> ReqwestCoordinator {
	coordinator_with_client(server, store, test_reqwest_http_client())
}

/// Coordinator over the mock provider with a caller-provided transport.
pub fn coordinator_with_client(
	server: &MockServer,
	store: Arc<dyn HandshakeStore>,
	http_client: ReqwestHttpClient,
) -> ReqwestCoordinator {
	ReqwestCoordinator::with_http_client(
		store,
		endpoints(server),
		ConsumerCredentials::new(CONSUMER_KEY, CONSUMER_SECRET),
		url(CALLBACK_URL),
		http_client,
	)
	.expect("Coordinator should build for the mock provider.")
}

/// Coordinator over the mock provider plus a handle to its memory store.
pub fn coordinator(server: &MockServer) -> (ReqwestCoordinator, MemoryStore) {
	let store = MemoryStore::default();
	let coordinator = coordinator_with_store(server, Arc::new(store.clone()));

	(coordinator, store)
}

pub fn request_token_body(token: &str, secret: &str) -> String {
	format!("oauth_token={token}&oauth_token_secret={secret}&oauth_callback_confirmed=true")
}

pub fn access_token_body(token: &str, secret: &str) -> String {
	format!("oauth_token={token}&oauth_token_secret={secret}&user_id=42&screen_name=broker")
}

/// Serves a request token pair on the request-token endpoint.
pub async fn mock_request_token<'a>(
	server: &'a MockServer,
	token: &str,
	secret: &str,
) -> httpmock::Mock<'a> {
	let body = request_token_body(token, secret);

	server
		.mock_async(|when, then| {
			when.method(POST).path(REQUEST_TOKEN_PATH).header_exists("authorization");
			then.status(200)
				.header("content-type", "application/x-www-form-urlencoded")
				.body(body.as_str());
		})
		.await
}

/// Serves an access token pair on the access-token endpoint.
pub async fn mock_access_token<'a>(
	server: &'a MockServer,
	token: &str,
	secret: &str,
) -> httpmock::Mock<'a> {
	let body = access_token_body(token, secret);

	server
		.mock_async(|when, then| {
			when.method(POST).path(ACCESS_TOKEN_PATH).header_exists("authorization");
			then.status(200)
				.header("content-type", "application/x-www-form-urlencoded")
				.body(body.as_str());
		})
		.await
}
