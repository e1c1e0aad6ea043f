//! Credential exchange with the member API.
//!
//! This module provides the `AuthClient` boundary that turns `Credentials`
//! into an `AuthToken`, the reqwest-backed `HttpAuthClient`, and the
//! `ExchangeOutcome` the login controller matches on.
//!
//! The server answers `POST /api/member/login` with `{ "token": "..." }`.

pub mod client;
pub mod error;
pub mod token;

pub use client::{AuthClient, HttpAuthClient, LocalAuthClient};
pub use error::{AuthError, ExchangeOutcome};
pub use token::AuthToken;
