// self
use crate::{_prelude::*, obs::HandshakeStep};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by handshake steps.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the step and a log-safe token fingerprint.
	pub fn new(step: HandshakeStep, token: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let token = if token.is_empty() {
				String::new()
			} else {
				crate::auth::fingerprint(token)
			};
			let span = tracing::info_span!("oauth1_broker.handshake", step = step.as_str(), token);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (step, token);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a failure event inside the current span (when tracing is enabled).
pub fn record_step_failure(step: HandshakeStep, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			step = step.as_str(),
			kind = error.kind(),
			error = %error,
			"Handshake step failed."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (step, error);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn flow_span_builds_without_subscriber() {
		let _span = FlowSpan::new(HandshakeStep::RequestToken, "");
	}

	#[cfg(feature = "tracing")]
	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FlowSpan::new(HandshakeStep::AccessToken, "abc");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
