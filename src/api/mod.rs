//! HTTP API layer: handlers, DTOs, middleware, and route wiring.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
