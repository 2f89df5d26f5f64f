//! HTTP API application wiring (Axum router + gateway injection).
//!
//! - `services.rs`: database gateway construction
//! - `routes/`: HTTP routes + handlers (generic CRUD controllers, system)
//! - `dto.rs`: response bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Router, routing::get};
use cinedex_infra::Gateway;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
///
/// The gateway is injected here and shared by every resource; nothing in the
/// API holds a global connection.
pub fn build_app(gateway: Arc<dyn Gateway>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router(gateway))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
