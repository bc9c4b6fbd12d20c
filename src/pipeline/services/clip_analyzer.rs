use crate::common::decode_base64_payload;
use crate::error::AppError;
use crate::pipeline::analysis::RuleCatalog;
use crate::pipeline::domain::{DetectorKind, SessionSummary};
use crate::pipeline::services::random::RandomSource;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

const SAMPLED_FPS: f64 = 30.0;
const MAX_SAMPLED_FRAMES: u32 = 100;
const FRAME_CONFIDENCE: (f64, f64) = (0.7, 1.0);
const FRAME_CORRECT_PROBABILITY: f64 = 0.8;
const GOOD_QUALITY_ACCURACY: f64 = 70.0;

/// Summarizes a practice clip by sampling frame verdicts across its duration.
///
/// Clips are not decoded frame by frame; each sampled frame's confidence and
/// correctness come from the injected random source, so a seeded source gives
/// a reproducible summary.
#[derive(Debug, Clone)]
pub struct ClipAnalyzer {
    catalog: Arc<RuleCatalog>,
    rng: RandomSource,
}

impl ClipAnalyzer {
    pub fn new(catalog: Arc<RuleCatalog>, rng: RandomSource) -> Self {
        Self { catalog, rng }
    }

    pub fn analyze(
        &self,
        video_ref: &str,
        pose_id: &str,
        user_id: &str,
        duration_seconds: f64,
    ) -> Result<SessionSummary, AppError> {
        let clip = decode_base64_payload(video_ref)?;
        if !duration_seconds.is_finite() || duration_seconds < 0.0 {
            return Err(AppError::Decode(format!(
                "duration must be a non-negative number of seconds, got {}",
                duration_seconds
            )));
        }

        let total_frames = ((duration_seconds * SAMPLED_FPS).floor() as u32).min(MAX_SAMPLED_FRAMES);
        let mut correct_frames = 0u32;
        let mut confidence_sum = 0.0;
        for _ in 0..total_frames {
            confidence_sum += self.rng.uniform(FRAME_CONFIDENCE.0, FRAME_CONFIDENCE.1);
            if self.rng.chance(FRAME_CORRECT_PROBABILITY) {
                correct_frames += 1;
            }
        }

        let (accuracy, avg_confidence) = if total_frames > 0 {
            (
                correct_frames as f64 / total_frames as f64 * 100.0,
                confidence_sum / total_frames as f64,
            )
        } else {
            (0.0, 0.0)
        };

        let pose_quality = if accuracy > GOOD_QUALITY_ACCURACY {
            "Good"
        } else {
            "Needs Improvement"
        };

        tracing::debug!(
            "Analyzed {} byte clip for {}: {}/{} frames correct",
            clip.len(),
            pose_id,
            correct_frames,
            total_frames
        );

        Ok(SessionSummary {
            success: true,
            session_id: Uuid::new_v4(),
            pose_id: pose_id.to_string(),
            user_id: user_id.to_string(),
            total_frames,
            correct_frames,
            accuracy,
            avg_confidence,
            duration_seconds,
            pose_quality: pose_quality.to_string(),
            feedback: vec![self.catalog.hint_for(pose_id)],
            recommendations: vec![
                "Practice consistently for better form".to_string(),
                "Focus on alignment in your poses".to_string(),
            ],
            detector_kind: DetectorKind::Fallback,
            analyzed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    fn analyzer(seed: u64) -> ClipAnalyzer {
        ClipAnalyzer::new(Arc::new(RuleCatalog::standard()), RandomSource::from_seed(seed))
    }

    fn clip() -> String {
        STANDARD.encode(b"fake mp4 bytes")
    }

    #[test]
    fn frame_count_is_capped() {
        let summary = analyzer(1).analyze(&clip(), "tree_pose", "u1", 30.0).unwrap();
        assert_eq!(summary.total_frames, 100);
        assert!(summary.correct_frames <= summary.total_frames);
        assert!((0.0..=100.0).contains(&summary.accuracy));
        assert!((0.7..=1.0).contains(&summary.avg_confidence));
        assert_eq!(summary.detector_kind, DetectorKind::Fallback);
    }

    #[test]
    fn short_clip_samples_thirty_per_second() {
        let summary = analyzer(1).analyze(&clip(), "tree_pose", "u1", 2.0).unwrap();
        assert_eq!(summary.total_frames, 60);
        let expected = summary.correct_frames as f64 / 60.0 * 100.0;
        assert!((summary.accuracy - expected).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_reports_zero_metrics() {
        let summary = analyzer(1).analyze(&clip(), "warrior_pose", "u1", 0.0).unwrap();
        assert_eq!(summary.total_frames, 0);
        assert_eq!(summary.accuracy, 0.0);
        assert_eq!(summary.pose_quality, "Needs Improvement");
        assert_eq!(summary.feedback, vec!["Bend your front knee more".to_string()]);
    }

    #[test]
    fn same_seed_same_summary() {
        let a = analyzer(9).analyze(&clip(), "tree_pose", "u1", 10.0).unwrap();
        let b = analyzer(9).analyze(&clip(), "tree_pose", "u1", 10.0).unwrap();
        assert_eq!(a.correct_frames, b.correct_frames);
        assert_eq!(a.avg_confidence, b.avg_confidence);
    }

    #[test]
    fn empty_and_malformed_clips_are_rejected() {
        assert!(matches!(
            analyzer(1).analyze("", "tree_pose", "u1", 30.0),
            Err(AppError::EmptyInput(_))
        ));
        assert!(matches!(
            analyzer(1).analyze("%%%", "tree_pose", "u1", 30.0),
            Err(AppError::Decode(_))
        ));
        assert!(matches!(
            analyzer(1).analyze(&clip(), "tree_pose", "u1", -1.0),
            Err(AppError::Decode(_))
        ));
    }
}
