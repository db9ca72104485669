//! Webapp-auth client SDK.
//!
//! This crate provides a client library for backends that delegate init data
//! verification to the webapp-auth service.
//!
//! # Example
//!
//! ```no_run
//! use webapp_auth_client::AuthClient;
//!
//! # async fn example(init_data: &str) -> Result<(), webapp_auth_client::ClientError> {
//! let client = AuthClient::new("http://webapp-auth.auth-system.svc:8080")?;
//!
//! let login = client.authenticate(init_data).await?;
//! println!("Welcome, user {} ({})", login.user.id, login.referral_code);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{AuthClient, ClientOptions};
pub use error::ClientError;
pub use types::*;
