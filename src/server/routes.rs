//! Route handlers for the handshake boundary.
//!
//! Not-found failures map to 404 and everything else to 500. Every failure is logged
//! with its error kind before the JSON body is returned.

// crates.io
use axum::{
	Json,
	extract::{Query, State},
	http::StatusCode,
	response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::json;
use time::format_description::well_known::Rfc3339;
// self
use crate::{_prelude::*, http::ProviderHttpClient, server::AppState};

/// Query accepted by `/auth/authorize`.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthorizeQuery {
	/// Request token to authorize.
	pub oauth_token: String,
}

/// Query the provider appends to the callback URL.
#[derive(Clone, Debug, Deserialize)]
pub struct CallbackQuery {
	/// Request token being completed.
	pub oauth_token: String,
	/// Verifier issued by the provider.
	pub oauth_verifier: String,
}

/// Body returned by `/auth/init`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitResponse {
	/// Newly issued request token.
	pub oauth_token: String,
}

/// Handshake failure rendered as `{"message": ...}`.
#[derive(Debug)]
pub struct ApiError {
	/// Underlying failure.
	pub error: Error,
	/// Client-facing message.
	pub message: &'static str,
}
impl ApiError {
	fn with(message: &'static str) -> impl FnOnce(Error) -> Self {
		move |error| Self { error, message }
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = if self.error.is_not_found() {
			StatusCode::NOT_FOUND
		} else {
			StatusCode::INTERNAL_SERVER_ERROR
		};

		tracing::error!(
			status = status.as_u16(),
			kind = self.error.kind(),
			error = %self.error,
			"{}",
			self.message
		);

		(status, Json(json!({ "message": self.message }))).into_response()
	}
}

/// `POST /auth/init`: obtain a request token.
pub async fn init<C>(State(state): State<AppState<C>>) -> Result<Json<InitResponse>, ApiError>
where
	C: ?Sized + ProviderHttpClient,
{
	let record = state
		.coordinator
		.request_token()
		.await
		.map_err(ApiError::with("Failed to initiate OAuth process."))?;

	tracing::info!("Stored OAuth request token.");

	Ok(Json(InitResponse { oauth_token: record.request_token }))
}

/// `GET /auth/start`: obtain a request token and render the confirmation form.
pub async fn start<C>(State(state): State<AppState<C>>) -> Result<Html<String>, ApiError>
where
	C: ?Sized + ProviderHttpClient,
{
	let record = state
		.coordinator
		.request_token()
		.await
		.map_err(ApiError::with("Failed to start the OAuth process."))?;

	Ok(Html(start_page(&record.request_token)))
}

/// `GET /auth/authorize`: redirect to the provider's authorization page.
pub async fn authorize<C>(
	State(state): State<AppState<C>>,
	Query(query): Query<AuthorizeQuery>,
) -> Result<Redirect, ApiError>
where
	C: ?Sized + ProviderHttpClient,
{
	let redirect = state
		.coordinator
		.present_authorization(&query.oauth_token)
		.await
		.map_err(ApiError::with("OAuth token not found."))?;

	tracing::info!("Redirecting to OAuth authorization page.");

	Ok(Redirect::to(redirect.url.as_str()))
}

/// `GET /auth/callback`: record the verifier and exchange for the access token.
pub async fn callback<C>(
	State(state): State<AppState<C>>,
	Query(query): Query<CallbackQuery>,
) -> Result<Json<serde_json::Value>, ApiError>
where
	C: ?Sized + ProviderHttpClient,
{
	state
		.coordinator
		.complete_callback(&query.oauth_token, &query.oauth_verifier)
		.await
		.map_err(ApiError::with("Not Authorized"))?;

	tracing::info!("Successfully fetched access token.");

	Ok(Json(json!({ "message": "Authorized" })))
}

/// `GET /health/db`: store connectivity smoke test.
pub async fn health_db<C>(State(state): State<AppState<C>>) -> Response
where
	C: ?Sized + ProviderHttpClient,
{
	match state.coordinator.store.ping().await {
		Ok(now) => Json(json!({
			"message": "Connection successful",
			"timestamp": now.format(&Rfc3339).ok(),
		}))
		.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "Database connection check failed.");

			(
				StatusCode::INTERNAL_SERVER_ERROR,
				Json(json!({ "message": "Connection failed", "error": e.to_string() })),
			)
				.into_response()
		},
	}
}

fn start_page(request_token: &str) -> String {
	let text = html_escape::encode_text(request_token);
	let attr = html_escape::encode_double_quoted_attribute(request_token);

	format!(
		r#"<!DOCTYPE html>
<html>
	<body>
		<h1>Success!</h1>
		<p>Your OAuth Token: {text}</p>
		<form action="/auth/authorize" method="GET">
			<input type="hidden" name="oauth_token" value="{attr}" />
			<button type="submit">Authorize</button>
		</form>
	</body>
</html>
"#
	)
}
