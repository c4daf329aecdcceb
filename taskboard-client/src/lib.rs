//! REST client for the Taskboard backend
//!
//! This crate is the network half of the Taskboard client: it knows how to
//! talk to the REST API and nothing about local state.
//!
//! - [`ApiClient`] wraps `reqwest`, attaches the bearer token supplied by a
//!   [`TokenProvider`] and normalizes every response into an [`ApiResponse`]
//! - [`api`] holds one async trait per resource family (boards, columns,
//!   tasks, statistics) with an HTTP implementation for each
//! - [`types`] holds the camelCase wire types shared with the `taskboard` crate
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskboard_client::{api::{BoardsApi, HttpBoardsApi}, ApiClient, AuthToken};
//! use taskboard_config::ApiConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let auth = AuthToken::with_token("my-token");
//! let client = ApiClient::new(&ApiConfig::default(), Arc::new(auth))?;
//! let boards = HttpBoardsApi::new(client).get_boards().await?;
//!
//! if boards.success {
//!     println!("{} boards", boards.data.unwrap_or_default().len());
//! } else {
//!     println!("failed: {}", boards.failure_message());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
mod auth;
mod client;
mod error;
mod response;
pub mod types;

pub use api::{ApiResult, HttpApis};
pub use auth::{Anonymous, AuthToken, TokenProvider};
pub use client::ApiClient;
pub use error::ClientError;
pub use response::{extract_error_message, normalize, ApiResponse};
