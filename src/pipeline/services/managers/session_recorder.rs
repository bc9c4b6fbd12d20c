use crate::error::AppError;
use crate::pipeline::domain::{SessionOutcome, SessionPage, SessionRecord};
use crate::pipeline::services::managers::SessionStore;
use std::collections::HashSet;
use std::sync::Arc;

/// Records practice results for identified users. Anonymous sentinels are never stored.
#[derive(Clone)]
pub struct SessionRecorder {
    store: Arc<dyn SessionStore>,
    anonymous_users: HashSet<String>,
}

impl SessionRecorder {
    pub fn new<I, S>(store: Arc<dyn SessionStore>, anonymous_users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            store,
            anonymous_users: anonymous_users.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_anonymous(&self, user_id: &str) -> bool {
        user_id.trim().is_empty() || self.anonymous_users.contains(user_id)
    }

    /// Returns the stored record, or `None` when the user is anonymous.
    pub fn record(
        &self,
        user_id: &str,
        pose_id: &str,
        outcome: SessionOutcome,
    ) -> Result<Option<SessionRecord>, AppError> {
        if self.is_anonymous(user_id) {
            tracing::debug!("Skipping session record for anonymous user {:?}", user_id);
            return Ok(None);
        }

        let record = SessionRecord::new(user_id, pose_id, outcome);
        self.store.append(record.clone())?;
        tracing::info!(
            "Recorded {} session {} for {}",
            pose_id,
            record.session_id,
            user_id
        );
        Ok(Some(record))
    }

    pub fn history(&self, user_id: &str) -> Result<Vec<SessionRecord>, AppError> {
        self.store.history(user_id)
    }

    pub fn page(&self, user_id: &str, page: usize, limit: usize) -> Result<SessionPage, AppError> {
        self.store.page(user_id, page, limit)
    }
}

impl std::fmt::Debug for SessionRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRecorder")
            .field("anonymous_users", &self.anonymous_users)
            .finish()
    }
}
