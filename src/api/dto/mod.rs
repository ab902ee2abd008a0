//! Request and response DTOs.

pub mod analytics;
pub mod health;
pub mod qr;
