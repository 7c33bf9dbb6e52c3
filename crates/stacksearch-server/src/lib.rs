//! # StackSearch Server
//!
//! HTTP surface over [`stacksearch_core::SearchEngine`]:
//!
//! - `GET /` liveness probe
//! - `GET|POST /getsearchresults` ranked results plus predicted tags
//!
//! The router is exposed here so it can be driven in tests without binding a
//! socket.

pub mod api;
pub mod config;
pub mod logging;

pub use api::{build_router, serve, AppState};
pub use config::{ServerConfig, DEFAULT_CONCURRENCY_LIMIT, DEFAULT_HOST, DEFAULT_PORT};
