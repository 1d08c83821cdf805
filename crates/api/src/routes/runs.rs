use axum::routing::post;
use axum::Router;

use crate::handlers::runs;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/run", post(runs::run))
        .route("/regenerate", post(runs::regenerate))
}
