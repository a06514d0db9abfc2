use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_tag, delete_tag, get_tag, list_tags, update_tag};

pub fn init_tags_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags).post(create_tag))
        .route("/{id}", get(get_tag).put(update_tag).delete(delete_tag))
}
