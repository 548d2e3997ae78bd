//! Explicit handshake state machine.

// self
use crate::_prelude::*;

/// Position of a handshake in the three-legged flow.
///
/// Storage only needs the verifier/grant columns to tell stored states apart; the enum
/// makes every step explicit so flows can check transitions before touching the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandshakeState {
	/// No record exists for the key.
	Init,
	/// Request token issued and persisted.
	Requested,
	/// User sent to the provider's authorization page.
	Authorized,
	/// Callback recorded the provider's verifier.
	Verified,
	/// Request token exchanged for an access token.
	AccessGranted,
}
impl HandshakeState {
	/// Returns a stable label suitable for logs or JSON payloads.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Init => "init",
			Self::Requested => "requested",
			Self::Authorized => "authorized",
			Self::Verified => "verified",
			Self::AccessGranted => "access_granted",
		}
	}

	/// Returns `true` once no further transition is possible.
	pub const fn is_terminal(self) -> bool {
		matches!(self, Self::AccessGranted)
	}

	/// Checks whether moving to `next` is a legal step.
	///
	/// Re-recording a verifier and re-sending the user to the provider are both allowed
	/// until the access token is granted.
	pub const fn can_transition_to(self, next: Self) -> bool {
		matches!(
			(self, next),
			(Self::Init, Self::Requested)
				| (Self::Requested, Self::Authorized | Self::Verified)
				| (Self::Authorized, Self::Authorized | Self::Verified)
				| (Self::Verified, Self::Authorized | Self::Verified | Self::AccessGranted)
		)
	}
}
impl Display for HandshakeState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn happy_path_transitions_are_legal() {
		let path = [
			HandshakeState::Init,
			HandshakeState::Requested,
			HandshakeState::Authorized,
			HandshakeState::Verified,
			HandshakeState::AccessGranted,
		];

		for pair in path.windows(2) {
			assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
		}
	}

	#[test]
	fn access_requires_verification() {
		assert!(!HandshakeState::Requested.can_transition_to(HandshakeState::AccessGranted));
		assert!(!HandshakeState::Authorized.can_transition_to(HandshakeState::AccessGranted));
		assert!(!HandshakeState::Init.can_transition_to(HandshakeState::Verified));
	}

	#[test]
	fn granted_is_terminal() {
		assert!(HandshakeState::AccessGranted.is_terminal());

		for next in [
			HandshakeState::Init,
			HandshakeState::Requested,
			HandshakeState::Authorized,
			HandshakeState::Verified,
			HandshakeState::AccessGranted,
		] {
			assert!(!HandshakeState::AccessGranted.can_transition_to(next));
		}
	}

	#[test]
	fn labels_are_snake_case() {
		assert_eq!(HandshakeState::AccessGranted.to_string(), "access_granted");
		assert_eq!(HandshakeState::Requested.as_str(), "requested");
	}
}
