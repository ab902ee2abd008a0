//! Infrastructure layer: PostgreSQL persistence and external adapters.

pub mod enrichment;
pub mod persistence;
pub mod render;
