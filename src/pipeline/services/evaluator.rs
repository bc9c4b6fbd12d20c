use crate::common::Frame;
use crate::config::EvaluationConfig;
use crate::pipeline::analysis::{RuleCatalog, angle};
use crate::pipeline::domain::{DetectorKind, PoseEstimate, Verdict};
use crate::pipeline::services::fallback::FallbackEvaluator;
use crate::pipeline::services::provider::{DetectorBackend, ProviderService};
use chrono::Utc;
use indexmap::IndexMap;
use std::sync::Arc;
use tower::timeout::{Timeout, TimeoutLayer};
use tower::{BoxError, Service, ServiceBuilder, ServiceExt};

/// Turns a frame into a verdict: detect, measure, compare, explain.
///
/// Never fails. Any detector absence, error, timeout or unusable geometry is
/// routed to the fallback evaluator so callers always get a well-formed verdict.
pub struct PoseEvaluator {
    catalog: Arc<RuleCatalog>,
    fallback: FallbackEvaluator,
    provider: Option<Timeout<ProviderService>>,
    backend: DetectorBackend,
    correctness_floor: f64,
    landmark_cap: usize,
}

impl PoseEvaluator {
    pub fn new(
        backend: DetectorBackend,
        catalog: Arc<RuleCatalog>,
        fallback: FallbackEvaluator,
        config: &EvaluationConfig,
    ) -> Self {
        let provider = match &backend {
            DetectorBackend::Real(provider) => Some(
                ServiceBuilder::new()
                    .layer(TimeoutLayer::new(config.provider_timeout()))
                    .service(ProviderService::new(provider.clone())),
            ),
            DetectorBackend::Fallback => None,
        };

        Self {
            catalog,
            fallback,
            provider,
            backend,
            correctness_floor: config.correctness_floor,
            landmark_cap: config.landmark_cap,
        }
    }

    pub fn detector_kind(&self) -> DetectorKind {
        self.backend.kind()
    }

    pub fn detector_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn evaluate(&self, frame: Frame, pose_id: &str) -> Verdict {
        let Some(provider) = &self.provider else {
            return self.fallback.evaluate(pose_id, "Detector unavailable");
        };

        let mut service = provider.clone();
        let detection: Result<Option<PoseEstimate>, BoxError> =
            match service.ready().await {
                Ok(ready) => ready.call(frame).await,
                Err(e) => Err(e),
            };

        match detection {
            Ok(Some(estimate)) if !estimate.is_empty() => self.score(estimate, pose_id),
            Ok(_) => {
                tracing::debug!("No pose found for {}, using fallback", pose_id);
                self.fallback.evaluate(pose_id, "No pose detected")
            }
            Err(e) => {
                let reason = describe_failure(&e);
                tracing::warn!("Landmark provider failed for {}: {}", pose_id, reason);
                self.fallback.evaluate(pose_id, &reason)
            }
        }
    }

    /// Scores an already detected pose against the catalog rules for `pose_id`.
    pub fn score(&self, estimate: PoseEstimate, pose_id: &str) -> Verdict {
        let checks = self.catalog.checks_for(pose_id);
        let mut angles = IndexMap::new();
        let mut feedback: Vec<String> = Vec::new();
        let mut skipped = 0usize;

        for check in checks {
            let (a, b, c) = check.landmarks;
            let (Some(pa), Some(pb), Some(pc)) =
                (estimate.find(a), estimate.find(b), estimate.find(c))
            else {
                tracing::warn!("Skipping {} for {}: landmark missing", check.name, pose_id);
                skipped += 1;
                continue;
            };

            match angle(pa.point(), pb.point(), pc.point()) {
                Ok(degrees) => {
                    angles.insert(check.name.to_string(), degrees);
                    if let Some(text) = check.feedback_for(degrees) {
                        if !feedback.iter().any(|f| f == text) {
                            feedback.push(text.to_string());
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping {} for {}: {}", check.name, pose_id, e);
                    skipped += 1;
                }
            }
        }

        if !checks.is_empty() && skipped == checks.len() {
            return self
                .fallback
                .evaluate(pose_id, "Could not measure any joint angle for this pose");
        }

        let confidence = estimate.mean_visibility();
        let is_correct = feedback.is_empty() && confidence >= self.correctness_floor;
        let mut landmarks = estimate.into_landmarks();
        landmarks.truncate(self.landmark_cap);

        tracing::debug!(
            "Scored {}: confidence={:.3} correct={} angles={:?}",
            pose_id,
            confidence,
            is_correct,
            angles
        );

        Verdict {
            success: true,
            pose_id: pose_id.to_string(),
            confidence,
            is_correct,
            feedback,
            tips: self.catalog.static_feedback(pose_id),
            angles,
            landmarks,
            detector_kind: DetectorKind::Real,
            timestamp: Utc::now(),
        }
    }
}

fn describe_failure(err: &BoxError) -> String {
    if err.is::<tower::timeout::error::Elapsed>() {
        "Detector timed out".to_string()
    } else {
        format!("Detector error: {}", err)
    }
}
