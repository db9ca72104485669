//! Init data authentication HTTP API.
//!
//! This crate exposes `webapp-auth-core` verification over HTTP:
//!
//! - Login with raw init data (`POST /v1/auth/telegram`)
//! - Per-request authentication via the `AuthUser` extractor
//!   (`Authorization: tma <init data>`)
//! - Health check
//!
//! Verification failures keep their kind: malformed input answers `400`,
//! a forged or stale payload answers `401`, and an unexpected fault answers
//! `500` without details.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Axum handlers all return Result
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::unused_async)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::AuthUser;
pub use config::{ConfigError, ServiceConfig};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
