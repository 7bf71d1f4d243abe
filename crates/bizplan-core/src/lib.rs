//! Core pipeline for bizplan: completion client, plan store, and the
//! orchestrating plan service.
//!
//! The flow per request is validation, then a single completion call, then an
//! atomic upsert keyed by `(business_name, industry)`. Each stage has its own
//! error kind; the service maps them into [`error::PlanError`] without
//! swallowing anything.

pub mod completion;
pub mod error;
pub mod service;
pub mod store;

pub use error::PlanError;
pub use service::PlanService;
