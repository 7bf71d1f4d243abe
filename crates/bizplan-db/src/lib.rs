//! PostgreSQL persistence for bizplan.
//!
//! Exposes a connection pool with embedded migrations, the [`models::PlanRecord`]
//! row type, and query functions over the `plans` table.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
