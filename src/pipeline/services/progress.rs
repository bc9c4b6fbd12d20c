use crate::pipeline::domain::{ProgressReport, SessionRecord, StreakInfo};
use chrono::{NaiveDate, Utc};
use indexmap::IndexMap;
use std::collections::BTreeSet;

const IMPROVEMENT_AREAS: usize = 3;
const WEEKLY_TARGET: usize = 3;

/// Reduces a user's session history into a progress report.
#[derive(Debug, Clone)]
pub struct ProgressAggregator {
    improvement_areas: usize,
}

impl Default for ProgressAggregator {
    fn default() -> Self {
        Self {
            improvement_areas: IMPROVEMENT_AREAS,
        }
    }
}

impl ProgressAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aggregate(&self, user_id: &str, history: &[SessionRecord]) -> ProgressReport {
        self.aggregate_as_of(user_id, history, Utc::now().date_naive())
    }

    /// Same as [`aggregate`](Self::aggregate) with streaks counted back from `today`.
    pub fn aggregate_as_of(
        &self,
        user_id: &str,
        history: &[SessionRecord],
        today: NaiveDate,
    ) -> ProgressReport {
        let total_sessions = history.len();

        let total_seconds: f64 = history
            .iter()
            .filter_map(|record| record.outcome.duration_seconds())
            .sum();

        // Frame verdicts carry no accuracy and count as zero.
        let average_accuracy = if total_sessions == 0 {
            0.0
        } else {
            history
                .iter()
                .map(|record| record.outcome.accuracy().unwrap_or(0.0))
                .sum::<f64>()
                / total_sessions as f64
        };

        let consistency = if total_sessions < WEEKLY_TARGET {
            format!("Practice {} more times this week", WEEKLY_TARGET - total_sessions)
        } else {
            "Great consistency!".to_string()
        };

        ProgressReport {
            user_id: user_id.to_string(),
            total_sessions,
            total_practice_minutes: total_seconds / 60.0,
            average_accuracy,
            improvement_areas: most_frequent_feedback(history, self.improvement_areas),
            recommendations: vec![
                consistency,
                "Focus on alignment in your poses".to_string(),
                "Try holding poses for longer durations".to_string(),
            ],
            next_goals: vec![
                "Achieve 80% accuracy in all poses".to_string(),
                "Complete 5 sessions this week".to_string(),
                "Try advanced variations of your current poses".to_string(),
            ],
            streak_info: streaks(history, today),
            generated_at: Utc::now(),
        }
    }
}

/// Top `k` feedback strings by count. Ties keep first-seen order.
fn most_frequent_feedback(history: &[SessionRecord], k: usize) -> Vec<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for record in history {
        for line in record.outcome.feedback() {
            *counts.entry(line.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    // sort_by is stable, so equal counts stay in insertion order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(k)
        .map(|(line, _)| line.to_string())
        .collect()
}

fn streaks(history: &[SessionRecord], today: NaiveDate) -> StreakInfo {
    let days: BTreeSet<NaiveDate> = history.iter().map(SessionRecord::day).collect();

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;
    for day in &days {
        run = match previous.and_then(|p| p.succ_opt()) {
            Some(next) if next == *day => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*day);
    }

    let mut current = 0u32;
    let mut cursor = Some(today);
    while let Some(day) = cursor {
        if !days.contains(&day) {
            break;
        }
        current += 1;
        cursor = day.pred_opt();
    }

    StreakInfo {
        current_streak: current,
        longest_streak: longest,
        last_session_date: days.iter().next_back().copied(),
    }
}
