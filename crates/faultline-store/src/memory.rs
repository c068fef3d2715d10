// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use faultline_model::{Issue, IssueDraft, IssueId, IssueUpdate};
use std::collections::BTreeMap;
use std::sync::atomic::AtomicU64;
use tokio::sync::Mutex;

use crate::{mint_issue_id, IssueFilter, IssueStore, StoreError};

/// In-process backend. Natural order is id order, which equals creation
/// order because minted ids are clock-prefixed. Data dies with the process.
pub struct MemoryStore {
    issues: Mutex<BTreeMap<IssueId, Issue>>,
    id_seq: AtomicU64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            issues: Mutex::new(BTreeMap::new()),
            id_seq: AtomicU64::new(0),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IssueStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find(&self, filter: &IssueFilter) -> Result<Vec<Issue>, StoreError> {
        let issues = self.issues.lock().await;
        Ok(issues
            .values()
            .filter(|issue| filter.matches(issue))
            .cloned()
            .collect())
    }

    async fn insert(
        &self,
        draft: IssueDraft,
        created_on: DateTime<Utc>,
    ) -> Result<Issue, StoreError> {
        let id = mint_issue_id(&self.id_seq)?;
        let mut issues = self.issues.lock().await;
        if issues.contains_key(&id) {
            return Err(StoreError(format!("id collision on insert: {id}")));
        }
        let issue = Issue::from_draft(draft, id.clone(), created_on);
        issues.insert(id, issue.clone());
        Ok(issue)
    }

    async fn update(
        &self,
        id: &IssueId,
        update: &IssueUpdate,
        updated_on: DateTime<Utc>,
    ) -> Result<Option<Issue>, StoreError> {
        let mut issues = self.issues.lock().await;
        match issues.get_mut(id) {
            Some(issue) => {
                issue.apply_update(update, updated_on);
                Ok(Some(issue.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &IssueId) -> Result<Option<Issue>, StoreError> {
        let mut issues = self.issues.lock().await;
        Ok(issues.remove(id))
    }
}
