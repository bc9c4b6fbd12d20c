use crate::api::ApiState;
use crate::coordinator::HealthStatus;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

const ENDPOINTS: &[&str] = &[
    "GET /health",
    "POST /api/ml/detect-pose",
    "POST /api/ml/analyze-session",
    "GET /api/ml/progress/{user_id}",
    "GET /api/ml/sessions/{user_id}",
    "GET /api/ml/supported-poses",
    "POST /api/ml/feedback",
    "POST /api/ml/camera/start",
    "POST /api/ml/camera/stop",
    "GET /api/ml/camera/status",
    "POST /api/ml/camera/detect",
];

pub fn add_route(app: Router<ApiState>) -> Router<ApiState> {
    app.route("/health", get(health))
        .route("/api/ml/test", get(service_index))
}

async fn health(State(coordinator): State<ApiState>) -> Json<HealthStatus> {
    Json(coordinator.health_check())
}

async fn service_index() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Pose coaching service is running",
        "endpoints": ENDPOINTS,
    }))
}
