mod basic;
mod camera;
mod detection;
mod error;
mod extract;
mod progress;

pub use error::ApiError;
pub use extract::ApiJson;

use crate::config::ServerConfig;
use crate::coordinator::Coordinator;
use crate::error::AppError;
use axum::Router;
use std::sync::Arc;

pub type ApiState = Arc<Coordinator>;

pub fn router(coordinator: ApiState) -> Router {
    add_routes(
        Router::new(),
        &[
            basic::add_route,
            detection::add_route,
            progress::add_route,
            camera::add_route,
        ],
    )
    .with_state(coordinator)
}

/// Binds the configured address and serves until the process is stopped.
pub async fn serve(coordinator: ApiState, server: &ServerConfig) -> Result<(), AppError> {
    let address = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::Bind(e, server.port))?;
    tracing::info!("Serving pose coaching API on {}", address);
    axum::serve(listener, router(coordinator))
        .await
        .map_err(|e| AppError::Bind(e, server.port))
}

fn add_routes<T>(app: Router<T>, funcs: &[fn(Router<T>) -> Router<T>]) -> Router<T> {
    let mut app = app;
    for func in funcs {
        app = func(app);
    }
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::CoordinatorBuilder;
    use crate::coordinator::tests::{png_payload, test_configuration};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let coordinator = CoordinatorBuilder::new(test_configuration()).build().unwrap();
        router(Arc::new(coordinator))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_the_detector() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["detector_kind"], "fallback");
    }

    #[tokio::test]
    async fn empty_image_is_a_bad_request() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/ml/detect-pose",
            Some(json!({ "image": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("empty"));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn unparseable_bodies_get_the_error_shape() {
        let app = app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/ml/detect-pose")
            .header("content-type", "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
        assert!(body["timestamp"].is_string());

        let (status, body) = send(&app, "POST", "/api/ml/analyze-session", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, body) = send(&app, "POST", "/api/ml/feedback", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn malformed_image_is_a_bad_request() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/ml/detect-pose",
            Some(json!({ "image": "bm90IGFuIGltYWdl" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn detection_feeds_progress_and_history() {
        let app = app();
        let (status, verdict) = send(
            &app,
            "POST",
            "/api/ml/detect-pose",
            Some(json!({ "image": png_payload(), "pose_type": "warrior_pose", "user_id": "zoe" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(verdict["success"], true);
        assert_eq!(verdict["pose_type"], "warrior_pose");
        assert_eq!(verdict["detector_kind"], "fallback");

        let (_, progress) = send(&app, "GET", "/api/ml/progress/zoe", None).await;
        assert_eq!(progress["progress"]["total_sessions"], 1);

        let (_, sessions) = send(&app, "GET", "/api/ml/sessions/zoe?page=1&limit=5", None).await;
        assert_eq!(sessions["pagination"]["total"], 1);
        assert_eq!(sessions["pagination"]["limit"], 5);
        assert_eq!(sessions["sessions"][0]["pose_type"], "warrior_pose");
    }

    #[tokio::test]
    async fn unknown_user_has_empty_progress() {
        let (status, body) = send(&app(), "GET", "/api/ml/progress/nobody", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["progress"]["total_sessions"], 0);
        assert_eq!(body["progress"]["average_accuracy"], 0.0);
    }

    #[tokio::test]
    async fn analyze_session_defaults_duration() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/ml/analyze-session",
            Some(json!({ "video_data": "Y2xpcA==" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_frames"], 100);
        assert_eq!(body["pose_type"], "tree_pose");
        assert_eq!(body["duration_seconds"], 30.0);
    }

    #[tokio::test]
    async fn static_catalog_routes() {
        let app = app();
        let (_, poses) = send(&app, "GET", "/api/ml/supported-poses", None).await;
        assert_eq!(poses["poses"].as_object().unwrap().len(), 4);

        let (_, feedback) = send(
            &app,
            "POST",
            "/api/ml/feedback",
            Some(json!({ "pose_type": "downward_dog" })),
        )
        .await;
        assert!(!feedback["feedback"].as_array().unwrap().is_empty());

        let (_, index) = send(&app, "GET", "/api/ml/test", None).await;
        assert!(index["endpoints"].as_array().unwrap().len() > 5);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn camera_lifecycle() {
        let app = app();
        let (status, _) = send(&app, "POST", "/api/ml/camera/start", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "POST", "/api/ml/camera/start", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);

        let (_, body) = send(&app, "GET", "/api/ml/camera/status", None).await;
        assert_eq!(body["camera"]["active"], true);

        let (_, body) = send(&app, "POST", "/api/ml/camera/stop", None).await;
        assert_eq!(body["was_running"], true);
        let (_, body) = send(&app, "POST", "/api/ml/camera/stop", None).await;
        assert_eq!(body["was_running"], false);

        let (status, body) = send(&app, "POST", "/api/ml/camera/detect", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}
