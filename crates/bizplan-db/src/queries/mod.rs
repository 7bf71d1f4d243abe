//! Query functions over the bizplan schema.

pub mod plans;
