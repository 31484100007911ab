//! Database layer - connection pool, schema and repositories
//!
//! Plain SQL through sqlx, no ORM. Repositories borrow the pool and map
//! rows into the record types the routes render.

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::create_pool;
pub use repos::*;
pub use sqlx::PgPool;
