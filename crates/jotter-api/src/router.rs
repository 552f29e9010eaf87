//! Route table and HTTP layers.

use std::path::Path;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::handlers;
use crate::middleware::visit_logging_middleware;
use crate::AppState;

/// Maximum accepted request body (form submissions).
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Build the application router.
///
/// Static files under `assets_dir` are mounted at `/assets` after the visit
/// logging layer, so asset requests are never recorded as visits.
pub fn create_router(state: AppState, assets_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/notes", post(handlers::create_note))
        .route("/notes/new", get(handlers::new_note))
        .route(
            "/notes/:id",
            get(handlers::show_note)
                .patch(handlers::update_note)
                .delete(handlers::delete_note),
        )
        .route("/notes/:id/edit", get(handlers::edit_note))
        .route("/analytics", get(handlers::analytics))
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(state.clone(), visit_logging_middleware))
        .nest_service("/assets", ServeDir::new(assets_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
