//! rentledger-server: HTTP API for rental property bookkeeping
//!
//! Exposes CRUD endpoints for properties and the expenses recorded
//! against them, backed by PostgreSQL.

pub mod db;
pub mod http;
pub mod models;

pub use http::{build_router, run_server, ApiError, AppState, ServerConfig};
