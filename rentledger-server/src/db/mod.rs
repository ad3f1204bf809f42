//! Database layer - connection pool, migrations, and repositories
//!
//! # Design Principles
//!
//! - Connection pool with a small cap - no Arc<Mutex<Connection>>
//! - Parameter binding for every user-supplied value
//! - fetch_optional + explicit NotFound instead of unwrapping rows
//! - Transactions for name-resolved expense writes

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::create_pool;
pub use repos::*;
