// self
use crate::obs::{FlowOutcome, HandshakeStep};

/// Records a step outcome via the global metrics recorder (when enabled).
pub fn record_step_outcome(step: HandshakeStep, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth1_broker_handshake_total",
			"step" => step.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (step, outcome);
	}
}
