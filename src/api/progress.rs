use crate::api::{ApiError, ApiState};
use crate::pipeline::services::managers::session_store::DEFAULT_PAGE_LIMIT;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

pub fn add_route(app: Router<ApiState>) -> Router<ApiState> {
    app.route("/api/ml/progress/{user_id}", get(progress))
        .route("/api/ml/sessions/{user_id}", get(sessions))
}

async fn progress(
    State(coordinator): State<ApiState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let report = coordinator.get_progress(&user_id)?;
    Ok(Json(json!({
        "success": true,
        "progress": report,
    })))
}

async fn sessions(
    State(coordinator): State<ApiState>,
    Path(user_id): Path<String>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Value>, ApiError> {
    let page = coordinator.list_sessions(
        &user_id,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
    )?;
    Ok(Json(json!({
        "success": true,
        "user_id": page.user_id,
        "sessions": page.sessions,
        "pagination": page.pagination,
    })))
}
