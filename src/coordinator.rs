use crate::{
    capture::{CameraManager, CameraStatus, SourceFactory},
    common::Frame,
    config::Configuration,
    error::AppError,
    pipeline::{
        analysis::{PoseInfo, RuleCatalog},
        domain::{
            DetectorKind, ProgressReport, SessionOutcome, SessionPage, SessionSummary, Verdict,
        },
        services::{
            ClipAnalyzer, DetectorBackend, FallbackEvaluator, InMemorySessionStore, PoseEvaluator,
            ProgressAggregator, RandomSource, SessionRecorder, SessionStore,
        },
    },
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub detector_kind: DetectorKind,
    pub detector_name: &'static str,
    pub camera_active: bool,
    pub timestamp: DateTime<Utc>,
}

/// Single entry point for every pose coaching operation.
pub struct Coordinator {
    catalog: Arc<RuleCatalog>,
    evaluator: PoseEvaluator,
    clip_analyzer: ClipAnalyzer,
    recorder: SessionRecorder,
    aggregator: ProgressAggregator,
    camera: Arc<CameraManager>,
}

impl Coordinator {
    pub fn builder(configuration: Configuration) -> CoordinatorBuilder {
        CoordinatorBuilder::new(configuration)
    }

    /// Evaluates one uploaded image and records the verdict for identified users.
    pub async fn detect(
        &self,
        image: &str,
        pose_id: &str,
        user_id: &str,
    ) -> Result<Verdict, AppError> {
        let frame = Frame::decode_base64(image)?;
        self.evaluate_and_record(frame, pose_id, user_id).await
    }

    pub fn analyze_session(
        &self,
        video_ref: &str,
        pose_id: &str,
        user_id: &str,
        duration_seconds: f64,
    ) -> Result<SessionSummary, AppError> {
        let summary = self
            .clip_analyzer
            .analyze(video_ref, pose_id, user_id, duration_seconds)?;
        self.recorder
            .record(user_id, pose_id, SessionOutcome::Summary(summary.clone()))?;
        Ok(summary)
    }

    /// Users without history get an empty report.
    pub fn get_progress(&self, user_id: &str) -> Result<ProgressReport, AppError> {
        let history = self.recorder.history(user_id)?;
        Ok(self.aggregator.aggregate(user_id, &history))
    }

    pub fn list_sessions(
        &self,
        user_id: &str,
        page: usize,
        limit: usize,
    ) -> Result<SessionPage, AppError> {
        self.recorder.page(user_id, page, limit)
    }

    pub fn list_supported_poses(&self) -> &IndexMap<&'static str, PoseInfo> {
        self.catalog.supported_poses()
    }

    pub fn get_feedback(&self, pose_id: &str) -> Vec<String> {
        self.catalog.static_feedback(pose_id)
    }

    pub fn health_check(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy",
            detector_kind: self.evaluator.detector_kind(),
            detector_name: self.evaluator.detector_name(),
            camera_active: self.camera.status().active,
            timestamp: Utc::now(),
        }
    }

    pub fn start_camera(&self) -> Result<CameraStatus, AppError> {
        self.camera.start()
    }

    /// Returns whether a capture loop was running. Joins the capture thread off the runtime.
    pub async fn stop_camera(&self) -> Result<bool, AppError> {
        let camera = self.camera.clone();
        tokio::task::spawn_blocking(move || camera.stop())
            .await
            .map_err(|e| AppError::Camera(format!("camera stop task failed: {}", e)))
    }

    pub fn camera_status(&self) -> CameraStatus {
        self.camera.status()
    }

    /// Evaluates the most recent camera frame.
    pub async fn detect_live(&self, pose_id: &str, user_id: &str) -> Result<Verdict, AppError> {
        let frame = self.camera.latest_frame().ok_or_else(|| {
            AppError::EmptyInput("no camera frame captured yet, start the camera first".to_string())
        })?;
        self.evaluate_and_record(frame, pose_id, user_id).await
    }

    async fn evaluate_and_record(
        &self,
        frame: Frame,
        pose_id: &str,
        user_id: &str,
    ) -> Result<Verdict, AppError> {
        if !self.catalog.is_known(pose_id) {
            tracing::debug!("Unknown pose {}, only generic feedback applies", pose_id);
        }
        let verdict = self.evaluator.evaluate(frame, pose_id).await;
        self.recorder
            .record(user_id, pose_id, SessionOutcome::Frame(verdict.clone()))?;
        Ok(verdict)
    }
}

pub struct CoordinatorBuilder {
    configuration: Configuration,
    backend: DetectorBackend,
    random_source: Option<RandomSource>,
    session_store: Option<Arc<dyn SessionStore>>,
    camera_source: Option<SourceFactory>,
}

impl CoordinatorBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            backend: DetectorBackend::Fallback,
            random_source: None,
            session_store: None,
            camera_source: None,
        }
    }

    // Selects the detector, defaults to the fallback provider.
    pub fn backend(mut self, backend: DetectorBackend) -> Self {
        self.backend = backend;
        self
    }

    // Overrides the seed from the configuration.
    pub fn random_source(mut self, random_source: RandomSource) -> Self {
        self.random_source = Some(random_source);
        self
    }

    pub fn session_store(mut self, session_store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(session_store);
        self
    }

    // Replaces the synthetic test pattern used by the camera.
    pub fn camera_source(mut self, camera_source: SourceFactory) -> Self {
        self.camera_source = Some(camera_source);
        self
    }

    pub fn build(self) -> Result<Coordinator, AppError> {
        self.configuration.validate().map_err(AppError::Config)?;
        let configuration = self.configuration;

        let catalog = Arc::new(RuleCatalog::standard());
        let rng = self
            .random_source
            .unwrap_or_else(|| RandomSource::new(configuration.fallback.seed));
        let fallback = FallbackEvaluator::new(catalog.clone(), rng.clone(), &configuration.fallback);
        let evaluator = PoseEvaluator::new(
            self.backend,
            catalog.clone(),
            fallback,
            &configuration.evaluation,
        );
        let store = self
            .session_store
            .unwrap_or_else(|| Arc::new(InMemorySessionStore::new()) as Arc<dyn SessionStore>);
        let recorder = SessionRecorder::new(store, configuration.sessions.anonymous_users.clone());
        let camera = match self.camera_source {
            Some(factory) => CameraManager::with_source_factory(configuration.camera.clone(), factory),
            None => CameraManager::new(configuration.camera.clone()),
        };

        tracing::info!(
            "Coordinator ready with {} ({} detector, {} poses)",
            evaluator.detector_name(),
            evaluator.detector_kind().as_str(),
            catalog.supported_poses().len()
        );

        Ok(Coordinator {
            clip_analyzer: ClipAnalyzer::new(catalog.clone(), rng),
            catalog,
            evaluator,
            recorder,
            aggregator: ProgressAggregator::new(),
            camera: Arc::new(camera),
        })
    }
}
