//! Request extractors shared by handlers.
//!
//! - [`auth`] -- JWT Bearer-token authentication.
//! - [`fingerprint`] -- device fingerprint derived from the `User-Agent` header.

pub mod auth;
pub mod fingerprint;
