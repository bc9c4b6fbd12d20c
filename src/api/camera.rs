use crate::api::detection::LiveDetectRequest;
use crate::api::{ApiError, ApiJson, ApiState};
use crate::pipeline::domain::Verdict;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

pub fn add_route(app: Router<ApiState>) -> Router<ApiState> {
    app.route("/api/ml/camera/start", post(start))
        .route("/api/ml/camera/stop", post(stop))
        .route("/api/ml/camera/status", get(status))
        .route("/api/ml/camera/detect", post(detect))
}

async fn start(State(coordinator): State<ApiState>) -> Result<Json<Value>, ApiError> {
    let camera = coordinator.start_camera()?;
    Ok(Json(json!({
        "success": true,
        "message": "Camera started",
        "camera": camera,
    })))
}

async fn stop(State(coordinator): State<ApiState>) -> Result<Json<Value>, ApiError> {
    let was_running = coordinator.stop_camera().await?;
    let message = if was_running {
        "Camera stopped"
    } else {
        "Camera was not running"
    };
    Ok(Json(json!({
        "success": true,
        "message": message,
        "was_running": was_running,
    })))
}

async fn status(State(coordinator): State<ApiState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "camera": coordinator.camera_status(),
    }))
}

async fn detect(
    State(coordinator): State<ApiState>,
    ApiJson(request): ApiJson<LiveDetectRequest>,
) -> Result<Json<Verdict>, ApiError> {
    let verdict = coordinator
        .detect_live(&request.pose_type, &request.user_id)
        .await?;
    Ok(Json(verdict))
}
