use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::draw;
use crate::middleware::require_admin;
use crate::participants;
use crate::state::AppState;

/// All API routes, without transport layers (CORS, tracing).
pub fn router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route(
            "/participants",
            get(participants::list_participants)
                .post(participants::create_participants)
                .patch(participants::rename_participant)
                .delete(participants::delete_participant),
        )
        .route("/reset", post(participants::reset_draw))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let public_routes = Router::new()
        .route("/reveal", post(draw::reveal))
        .route("/draw/{slug}", get(draw::draw_page))
        .route("/health", get(draw::health));

    Router::new()
        .merge(admin_routes)
        .merge(public_routes)
        .with_state(state)
}
