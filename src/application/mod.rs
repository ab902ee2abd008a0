//! Application layer: use-case services over the domain repositories.

pub mod services;
