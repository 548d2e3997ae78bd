//! Shared helpers for handshake steps (observation, not-found classification, guards).

// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	error::NotFoundError,
	flows::HandshakeCoordinator,
	http::ProviderHttpClient,
	obs::{self, FlowOutcome, FlowSpan, HandshakeStep},
};

/// Runs `fut` inside the step span and records attempt/success/failure.
pub(crate) async fn observe<F, T>(step: HandshakeStep, request_token: &str, fut: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(step, request_token);

	obs::record_step_outcome(step, FlowOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => obs::record_step_outcome(step, FlowOutcome::Success),
		Err(e) => {
			obs::record_step_failure(step, e);
			obs::record_step_outcome(step, FlowOutcome::Failure);
		},
	}

	result
}

/// Fetches a record or fails with [`NotFoundError::UnknownToken`].
pub(crate) async fn fetch_known<C>(
	coordinator: &HandshakeCoordinator<C>,
	request_token: &str,
) -> Result<TokenRecord>
where
	C: ?Sized + ProviderHttpClient,
{
	coordinator
		.store
		.fetch(request_token)
		.await?
		.ok_or_else(|| NotFoundError::UnknownToken { request_token: request_token.into() }.into())
}

/// Classifies a conditional update that matched no row.
pub(crate) async fn missing_error<C>(
	coordinator: &HandshakeCoordinator<C>,
	request_token: &str,
) -> Error
where
	C: ?Sized + ProviderHttpClient,
{
	let request_token = request_token.to_owned();

	match coordinator.store.fetch(&request_token).await {
		Ok(Some(record)) if record.is_granted() =>
			NotFoundError::AlreadyGranted { request_token }.into(),
		Ok(_) => NotFoundError::UnknownToken { request_token }.into(),
		Err(e) => e.into(),
	}
}

type GuardMap = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Handle on the per-token guard.
///
/// Dropping the last lease for a token removes its map entry, including when the owning
/// future is cancelled mid-step.
pub(crate) struct HandshakeLease {
	guards: GuardMap,
	request_token: String,
	guard: Arc<AsyncMutex<()>>,
}
impl HandshakeLease {
	/// Returns (and creates on demand) the guard serialising work on one request token.
	pub(crate) fn acquire<C>(coordinator: &HandshakeCoordinator<C>, request_token: &str) -> Self
	where
		C: ?Sized + ProviderHttpClient,
	{
		let guards = coordinator.handshake_guards.clone();
		let guard = guards
			.lock()
			.entry(request_token.to_owned())
			.or_insert_with(|| Arc::new(AsyncMutex::new(())))
			.clone();

		Self { guards, request_token: request_token.to_owned(), guard }
	}

	/// Waits for exclusive access to the handshake.
	pub(crate) async fn lock(&self) -> AsyncMutexGuard<'_, ()> {
		self.guard.lock().await
	}
}
impl Drop for HandshakeLease {
	fn drop(&mut self) {
		let mut guards = self.guards.lock();

		if let Some(current) = guards.get(&self.request_token) {
			// One handle lives in the map, the other is ours.
			if Arc::ptr_eq(current, &self.guard) && Arc::strong_count(&self.guard) == 2 {
				guards.remove(&self.request_token);
			}
		}
	}
}
