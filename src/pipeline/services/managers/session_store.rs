use crate::error::AppError;
use crate::pipeline::domain::{Pagination, SessionPage, SessionRecord};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Append-only per-user session history.
pub trait SessionStore: Send + Sync {
    fn append(&self, record: SessionRecord) -> Result<(), AppError>;

    /// The user's records in append order.
    fn history(&self, user_id: &str) -> Result<Vec<SessionRecord>, AppError>;

    /// One page of the user's records, newest first. Pages start at 1.
    fn page(&self, user_id: &str, page: usize, limit: usize) -> Result<SessionPage, AppError> {
        let page = page.max(1);
        let limit = if limit == 0 { DEFAULT_PAGE_LIMIT } else { limit };

        let mut records = self.history(user_id)?;
        records.reverse();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let total = records.len();
        let pages = total.div_ceil(limit);
        let sessions = records
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();

        Ok(SessionPage {
            user_id: user_id.to_string(),
            sessions,
            pagination: Pagination {
                page,
                limit,
                total,
                pages,
            },
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStoreStats {
    pub tracked_users: usize,
    pub total_records: usize,
}

/// Process-local store. Histories live for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    histories: RwLock<HashMap<String, Vec<SessionRecord>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> SessionStoreStats {
        let histories = self.histories.read().unwrap_or_else(PoisonError::into_inner);
        SessionStoreStats {
            tracked_users: histories.len(),
            total_records: histories.values().map(Vec::len).sum(),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn append(&self, record: SessionRecord) -> Result<(), AppError> {
        // A panicked writer can only have left a fully pushed or untouched Vec behind.
        let mut histories = self.histories.write().unwrap_or_else(PoisonError::into_inner);
        histories
            .entry(record.user_id.clone())
            .or_default()
            .push(record);
        Ok(())
    }

    fn history(&self, user_id: &str) -> Result<Vec<SessionRecord>, AppError> {
        let histories = self.histories.read().unwrap_or_else(PoisonError::into_inner);
        Ok(histories.get(user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::domain::{DetectorKind, SessionOutcome, Verdict};
    use chrono::{Duration, Utc};
    use indexmap::IndexMap;
    use std::sync::Arc;

    fn record(user_id: &str) -> SessionRecord {
        SessionRecord::new(
            user_id,
            "tree_pose",
            SessionOutcome::Frame(Verdict {
                success: true,
                pose_id: "tree_pose".to_string(),
                confidence: 0.8,
                is_correct: true,
                feedback: Vec::new(),
                tips: Vec::new(),
                angles: IndexMap::new(),
                landmarks: Vec::new(),
                detector_kind: DetectorKind::Fallback,
                timestamp: Utc::now(),
            }),
        )
    }

    #[test]
    fn histories_are_per_user_and_ordered() {
        let store = InMemorySessionStore::new();
        let first = record("u1");
        let second = record("u1");
        store.append(first.clone()).unwrap();
        store.append(record("u2")).unwrap();
        store.append(second.clone()).unwrap();

        let history = store.history("u1").unwrap();
        assert_eq!(history, vec![first, second]);
        assert!(store.history("nobody").unwrap().is_empty());
        assert_eq!(
            store.stats(),
            SessionStoreStats {
                tracked_users: 2,
                total_records: 3
            }
        );
    }

    #[test]
    fn pages_are_newest_first() {
        let store = InMemorySessionStore::new();
        let base = Utc::now();
        for offset in 0..25 {
            store
                .append(record("u1").with_timestamp(base + Duration::minutes(offset)))
                .unwrap();
        }

        let first = store.page("u1", 1, 10).unwrap();
        assert_eq!(first.sessions.len(), 10);
        assert_eq!(first.sessions[0].timestamp, base + Duration::minutes(24));
        assert_eq!(
            first.pagination,
            Pagination {
                page: 1,
                limit: 10,
                total: 25,
                pages: 3
            }
        );

        let last = store.page("u1", 3, 10).unwrap();
        assert_eq!(last.sessions.len(), 5);
        assert_eq!(last.sessions[4].timestamp, base);

        assert!(store.page("u1", 4, 10).unwrap().sessions.is_empty());
    }

    #[test]
    fn zero_page_and_limit_use_defaults() {
        let store = InMemorySessionStore::new();
        store.append(record("u1")).unwrap();
        let page = store.page("u1", 0, 0).unwrap();
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(page.sessions.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_appends_are_not_lost() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..25 {
                    store.append(record("shared")).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.history("shared").unwrap().len(), 400);
    }
}
