use crate::pipeline::domain::landmark::Landmark;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which path produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    Real,
    Fallback,
}

impl DetectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorKind::Real => "real",
            DetectorKind::Fallback => "fallback",
        }
    }
}

/// Evaluation of a single frame against one pose.
///
/// On the real path `is_correct` holds exactly when `feedback` is empty and the
/// confidence reaches the correctness floor. Fallback verdicts carry randomized
/// correctness and always explain themselves in `feedback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub success: bool,
    #[serde(rename = "pose_type")]
    pub pose_id: String,
    pub confidence: f64,
    pub is_correct: bool,
    pub feedback: Vec<String>,
    /// Static advice for the pose, independent of what was detected.
    pub tips: Vec<String>,
    pub angles: IndexMap<String, f64>,
    pub landmarks: Vec<Landmark>,
    pub detector_kind: DetectorKind,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate verdict over an analyzed clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub success: bool,
    pub session_id: Uuid,
    #[serde(rename = "pose_type")]
    pub pose_id: String,
    pub user_id: String,
    pub total_frames: u32,
    pub correct_frames: u32,
    /// Percentage of correct frames, 0 to 100.
    pub accuracy: f64,
    pub avg_confidence: f64,
    pub duration_seconds: f64,
    pub pose_quality: String,
    pub feedback: Vec<String>,
    pub recommendations: Vec<String>,
    pub detector_kind: DetectorKind,
    pub analyzed_at: DateTime<Utc>,
}
