//! # jotter-api
//!
//! HTTP front end for jotter: configuration, routing, the visit logging
//! middleware, page handlers and views. The binary in `main.rs` wires these
//! to a store and serves them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod state;
pub mod views;

pub use config::{Config, LogConfig, StoreKind};
pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;
