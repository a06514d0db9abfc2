use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
};

use crate::middleware::auth::require_auth;
use crate::state::AppState;

use super::controller::{delete_image, list_images, upload_image};

/// Room for multipart boundaries and the text fields around the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn init_images_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_images))
        .route("/{id}", delete(delete_image))
}

/// Every upload route requires a bearer token; the body cap follows `UPLOAD_MAX_BYTES`.
pub fn init_upload_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/image", post(upload_image))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(DefaultBodyLimit::max(
            state.upload_config.max_bytes + MULTIPART_OVERHEAD,
        ))
}
