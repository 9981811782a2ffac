pub mod caption;
pub mod error;
pub mod health;
pub mod search;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// All HTTP routes. `/search` is kept as an alias of `/api/search`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", post(search::search))
        .route("/search", post(search::search))
        .route("/api/caption", post(caption::caption))
        .route("/api/health", get(health::health))
        .with_state(state)
}
