//! Visit logging middleware.
//!
//! Records one visit per GET request before the request reaches its handler.
//! The write is awaited, so a handler never runs ahead of its own visit
//! record. If the write fails the request fails with it.

use axum::{
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use jotter_core::NewVisit;

use crate::error::ApiError;
use crate::AppState;

/// Build the visit for `req`, or `None` when the request is not a GET.
///
/// The path excludes the query string. A missing or non-UTF-8 `User-Agent`
/// header is recorded as absent.
pub fn visit_for_request(req: &Request) -> Option<NewVisit> {
    if req.method() != Method::GET {
        return None;
    }

    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
        .map(String::from);

    Some(NewVisit {
        path: req.uri().path().to_string(),
        user_agent,
    })
}

/// Visit logging middleware function.
pub async fn visit_logging_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(visit) = visit_for_request(&req) {
        if let Err(e) = state.visits.record(visit).await {
            return ApiError::from(e).into_response();
        }
    }

    next.run(req).await
}
