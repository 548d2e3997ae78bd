//! Token records persisted across handshake steps.

pub mod record;
pub mod secret;
pub mod state;
