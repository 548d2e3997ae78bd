//! Public extension contracts for using granted access tokens.
//!
//! [`RequestSignerExt`] lets callers attach a granted handshake's access token to their
//! own outbound API requests. The crate ships an implementation for
//! [`Signer`](crate::oauth::Signer) over `reqwest::Request` behind the `reqwest` feature.

pub mod request_signer;

pub use request_signer::*;
