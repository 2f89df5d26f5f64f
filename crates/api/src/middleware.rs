use axum::{
    body::{Body, Bytes, to_bytes},
    extract::Request,
    http::{HeaderValue, StatusCode, header::{CONTENT_LENGTH, CONTENT_TYPE}},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use cinedex_core::{DomainError, Resource, validate};

use crate::app::errors::{ApiError, json_error};

/// Same ceiling axum applies to its `Json` extractor.
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Run `R`'s rule table over the request body before the handler.
///
/// Rejects with 422 and every violation when any rule fails; the handler is
/// not called. A body that is missing, unparsable, or not a JSON object is
/// read as `{}`: it is validated as such and forwarded as such.
pub async fn validate_body<R: Resource>(req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();
    let bytes = match to_bytes(body, BODY_LIMIT).await {
        Ok(b) => b,
        Err(e) => {
            return json_error(StatusCode::BAD_REQUEST, "invalid_body", e.to_string());
        }
    };

    let (fields, bytes) = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(fields)) => (fields, bytes),
        _ => {
            tracing::debug!(resource = R::NAME, "body is not a JSON object; reading it as {{}}");
            parts.headers.remove(CONTENT_LENGTH);
            (Map::new(), Bytes::from_static(b"{}"))
        }
    };
    // Whatever is forwarded is a JSON object now.
    parts
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Err(err) = DomainError::check(validate(R::rules(), &fields)) {
        tracing::debug!(resource = R::NAME, "rejected body: {err}");
        return ApiError::from(err).into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
