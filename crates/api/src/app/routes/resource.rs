//! Generic CRUD controllers, instantiated once per [`Resource`].
//!
//! Each handler issues one store call and maps its outcome:
//! rows/affected counts decide between success and 404, store errors are 500.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
};
use serde_json::{Map, Value};
use tracing::instrument;

use cinedex_core::{RecordId, Resource};
use cinedex_infra::ResourceStore;

use crate::app::dto::CreatedResponse;
use crate::app::errors::ApiError;
use crate::middleware::validate_body;

type Store<R> = Extension<Arc<ResourceStore<R>>>;

/// `/` and `/:id` routes for `R`; POST and PUT run the validation middleware first.
pub fn router<R: Resource>(store: Arc<ResourceStore<R>>) -> Router {
    Router::new()
        .route(
            "/",
            get(list::<R>).merge(post(create::<R>).layer(middleware::from_fn(validate_body::<R>))),
        )
        .route(
            "/:id",
            get(fetch::<R>)
                .delete(remove::<R>)
                .merge(put(update::<R>).layer(middleware::from_fn(validate_body::<R>))),
        )
        .layer(Extension(store))
}

#[instrument(skip_all, fields(resource = R::NAME))]
pub async fn list<R: Resource>(Extension(store): Store<R>) -> Result<Json<Vec<R>>, ApiError> {
    Ok(Json(store.list().await?))
}

#[instrument(skip_all, fields(resource = R::NAME, id = %id))]
pub async fn fetch<R: Resource>(
    Extension(store): Store<R>,
    Path(id): Path<String>,
) -> Result<Json<R>, ApiError> {
    let id: RecordId = id.parse()?;
    store.get(id).await?.map(Json).ok_or(ApiError::NotFound)
}

#[instrument(skip_all, fields(resource = R::NAME))]
pub async fn create<R: Resource>(
    Extension(store): Store<R>,
    Json(body): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let id = store.insert(&body).await?;
    tracing::info!(%id, "created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[instrument(skip_all, fields(resource = R::NAME, id = %id))]
pub async fn update<R: Resource>(
    Extension(store): Store<R>,
    Path(id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Result<StatusCode, ApiError> {
    let id: RecordId = id.parse()?;
    if store.update(id, &body).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

#[instrument(skip_all, fields(resource = R::NAME, id = %id))]
pub async fn remove<R: Resource>(
    Extension(store): Store<R>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: RecordId = id.parse()?;
    if store.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
