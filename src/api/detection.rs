use crate::api::{ApiError, ApiJson, ApiState};
use crate::pipeline::domain::{SessionSummary, Verdict};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

fn default_pose() -> String {
    "tree_pose".to_string()
}

fn default_user() -> String {
    "anonymous".to_string()
}

fn default_duration() -> f64 {
    30.0
}

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_pose")]
    pub pose_type: String,
    #[serde(default = "default_user")]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeSessionRequest {
    #[serde(default)]
    pub video_data: String,
    #[serde(default = "default_pose")]
    pub pose_type: String,
    #[serde(default = "default_user")]
    pub user_id: String,
    #[serde(default = "default_duration")]
    pub duration_seconds: f64,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default = "default_pose")]
    pub pose_type: String,
}

#[derive(Debug, Deserialize)]
pub struct LiveDetectRequest {
    #[serde(default = "default_pose")]
    pub pose_type: String,
    #[serde(default = "default_user")]
    pub user_id: String,
}

pub fn add_route(app: Router<ApiState>) -> Router<ApiState> {
    app.route("/api/ml/detect-pose", post(detect_pose))
        .route("/api/ml/analyze-session", post(analyze_session))
        .route("/api/ml/feedback", post(feedback))
        .route(
            "/api/ml/supported-poses",
            axum::routing::get(supported_poses),
        )
}

async fn detect_pose(
    State(coordinator): State<ApiState>,
    ApiJson(request): ApiJson<DetectRequest>,
) -> Result<Json<Verdict>, ApiError> {
    tracing::debug!(
        "detect-pose for {} as {}",
        request.pose_type,
        request.user_id
    );
    let verdict = coordinator
        .detect(&request.image, &request.pose_type, &request.user_id)
        .await?;
    Ok(Json(verdict))
}

async fn analyze_session(
    State(coordinator): State<ApiState>,
    ApiJson(request): ApiJson<AnalyzeSessionRequest>,
) -> Result<Json<SessionSummary>, ApiError> {
    let summary = coordinator.analyze_session(
        &request.video_data,
        &request.pose_type,
        &request.user_id,
        request.duration_seconds,
    )?;
    Ok(Json(summary))
}

async fn feedback(
    State(coordinator): State<ApiState>,
    ApiJson(request): ApiJson<FeedbackRequest>,
) -> Json<Value> {
    Json(json!({
        "success": true,
        "pose_type": request.pose_type,
        "feedback": coordinator.get_feedback(&request.pose_type),
    }))
}

async fn supported_poses(State(coordinator): State<ApiState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "poses": coordinator.list_supported_poses(),
    }))
}
