//! HTTP API: routing, validation middleware, and request/response mapping.

pub mod app;
pub mod middleware;
