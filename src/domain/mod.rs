//! Domain layer: entities, repository traits, and the scan pipeline.

pub mod enrichment;
pub mod entities;
pub mod renderer;
pub mod repositories;
pub mod scan_message;
pub mod scan_worker;
