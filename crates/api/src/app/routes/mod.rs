use std::sync::Arc;

use axum::Router;

use cinedex_core::{Movie, User};
use cinedex_infra::{Gateway, ResourceStore};

pub mod resource;
pub mod system;

/// Router for every `/api/*` resource, all sharing one gateway.
pub fn router(gateway: Arc<dyn Gateway>) -> Router {
    let movies = Arc::new(ResourceStore::<Movie>::new(gateway.clone()));
    let users = Arc::new(ResourceStore::<User>::new(gateway));

    Router::new()
        .nest("/api/movies", resource::router(movies))
        .nest("/api/users", resource::router(users))
}
