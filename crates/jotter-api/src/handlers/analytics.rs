//! Page view analytics.

use axum::{extract::State, response::Html};
use minijinja::context;

use crate::error::ApiError;
use crate::AppState;

/// `GET /analytics`
pub async fn analytics(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let page_views = state.visits.page_views().await?;
    let total = state.visits.count().await?;

    let page = state.views.render(
        "analytics.html",
        context! {
            page_views => page_views,
            total => total,
        },
    )?;
    Ok(Html(page))
}
