//! Shared utilities.

pub mod short_code;
