use crate::pipeline::domain::verdict::{SessionSummary, Verdict};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a recorded session holds: a single-frame verdict or a clip summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum SessionOutcome {
    Frame(Verdict),
    Summary(SessionSummary),
}

impl SessionOutcome {
    pub fn duration_seconds(&self) -> Option<f64> {
        match self {
            SessionOutcome::Frame(_) => None,
            SessionOutcome::Summary(summary) => Some(summary.duration_seconds),
        }
    }

    pub fn accuracy(&self) -> Option<f64> {
        match self {
            SessionOutcome::Frame(_) => None,
            SessionOutcome::Summary(summary) => Some(summary.accuracy),
        }
    }

    pub fn feedback(&self) -> &[String] {
        match self {
            SessionOutcome::Frame(verdict) => &verdict.feedback,
            SessionOutcome::Summary(summary) => &summary.feedback,
        }
    }
}

/// One recorded practice interaction. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: Uuid,
    pub user_id: String,
    #[serde(rename = "pose_type")]
    pub pose_id: String,
    pub timestamp: DateTime<Utc>,
    pub outcome: SessionOutcome,
}

impl SessionRecord {
    pub fn new(user_id: &str, pose_id: &str, outcome: SessionOutcome) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            pose_id: pose_id.to_string(),
            timestamp: Utc::now(),
            outcome,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakInfo {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_session_date: Option<NaiveDate>,
}

/// Summary of a user's history, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub user_id: String,
    pub total_sessions: usize,
    pub total_practice_minutes: f64,
    pub average_accuracy: f64,
    pub improvement_areas: Vec<String>,
    pub recommendations: Vec<String>,
    pub next_goals: Vec<String>,
    pub streak_info: StreakInfo,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

/// A page of a user's history, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPage {
    pub user_id: String,
    pub sessions: Vec<SessionRecord>,
    pub pagination: Pagination,
}
