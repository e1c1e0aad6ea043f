//! Core library for memberlogin.
//!
//! This crate provides the client side of a member login flow:
//! - `validator`: presence checks over the credentials form
//! - `auth`: exchange of credentials for a session token
//! - `session`: shared, injectable session state
//! - `store`: persistence for the "remember my ID" option
//! - `controller`: the login form state machine tying it all together
//! - `config`: application configuration

pub mod auth;
pub mod config;
pub mod controller;
pub mod session;
pub mod store;
pub mod validator;

pub use auth::{AuthClient, AuthError, AuthToken, ExchangeOutcome, HttpAuthClient};
pub use config::{Config, ConfigError, StoreBackend};
pub use controller::{LoginController, LoginEvent, LoginHost, LoginPhase, SubmitOutcome};
pub use session::{Session, SessionContext};
pub use store::{
    FileIdentifierStore, IdentifierStore, KeyringIdentifierStore, MemoryIdentifierStore,
    StoreError,
};
pub use validator::{validate, Credentials, Field, ValidationErrors};
