//! Auth-domain credentials, redacted secrets, handshake records, and states.

pub mod credentials;
pub mod token;

pub use credentials::*;
pub use token::{record::*, secret::*, state::*};
