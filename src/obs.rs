//! Optional observability helpers for handshake steps.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth1_broker.handshake` with the `step`
//!   field.
//! - Enable `metrics` to increment the `oauth1_broker_handshake_total` counter for every
//!   attempt/success/failure, labeled by `step` + `outcome`.
//! - The `server` feature adds [`init_subscriber`], which installs the process-wide
//!   `tracing-subscriber` pipeline.

mod metrics;
#[cfg(feature = "server")] mod subscriber;
mod tracing;

pub use metrics::*;
#[cfg(feature = "server")] pub use subscriber::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Handshake steps observed by the broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandshakeStep {
	/// Leg one: obtain a request token.
	RequestToken,
	/// Leg two: send the user to the provider.
	Authorize,
	/// Callback verifier bookkeeping.
	Verifier,
	/// Leg three: exchange for an access token.
	AccessToken,
	/// Verifier + exchange as served by the callback route.
	Callback,
}
impl HandshakeStep {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			HandshakeStep::RequestToken => "request_token",
			HandshakeStep::Authorize => "authorize",
			HandshakeStep::Verifier => "verifier",
			HandshakeStep::AccessToken => "access_token",
			HandshakeStep::Callback => "callback",
		}
	}
}
impl Display for HandshakeStep {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a handshake step.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
