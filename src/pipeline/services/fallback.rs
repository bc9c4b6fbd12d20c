use crate::config::FallbackConfig;
use crate::pipeline::analysis::RuleCatalog;
use crate::pipeline::domain::{DetectorKind, Verdict};
use crate::pipeline::services::random::RandomSource;
use chrono::Utc;
use std::sync::Arc;

const DEFAULT_REASON: &str = "Detector unavailable";

/// Produces verdicts shaped like the real evaluator's when no detection is possible.
#[derive(Debug, Clone)]
pub struct FallbackEvaluator {
    catalog: Arc<RuleCatalog>,
    rng: RandomSource,
    confidence_range: (f64, f64),
    correct_bias: f64,
}

impl FallbackEvaluator {
    pub fn new(catalog: Arc<RuleCatalog>, rng: RandomSource, config: &FallbackConfig) -> Self {
        Self {
            catalog,
            rng,
            confidence_range: (config.confidence_min, config.confidence_max),
            correct_bias: config.correct_bias,
        }
    }

    /// Draws confidence first, then correctness, from the injected source.
    pub fn evaluate(&self, pose_id: &str, reason: &str) -> Verdict {
        let (low, high) = self.confidence_range;
        let confidence = self.rng.uniform(low, high);
        let is_correct = self.rng.chance(self.correct_bias);

        let reason = if reason.trim().is_empty() {
            DEFAULT_REASON
        } else {
            reason
        };
        let feedback = vec![reason.to_string(), self.catalog.hint_for(pose_id)];

        tracing::debug!(
            "Fallback verdict for {}: confidence={:.3} correct={} reason={}",
            pose_id,
            confidence,
            is_correct,
            reason
        );

        Verdict {
            success: true,
            pose_id: pose_id.to_string(),
            confidence,
            is_correct,
            feedback,
            tips: self.catalog.static_feedback(pose_id),
            angles: self.catalog.placeholder_angles(pose_id),
            landmarks: Vec::new(),
            detector_kind: DetectorKind::Fallback,
            timestamp: Utc::now(),
        }
    }
}
