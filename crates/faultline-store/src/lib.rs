// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use faultline_model::{Issue, IssueDraft, IssueId, IssueUpdate};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

mod filter;
mod local_fs;
mod memory;

pub use filter::IssueFilter;
pub use local_fs::LocalFsStore;
pub use memory::MemoryStore;

pub const CRATE_NAME: &str = "faultline-store";

#[derive(Debug)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for StoreError {}

/// The document-persistence collaborator. `update`/`delete` address issues
/// by id alone; `Ok(None)` is not-found, `Err` is an infrastructure
/// failure. Callers collapse both into one client-facing message.
#[async_trait]
pub trait IssueStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn find(&self, filter: &IssueFilter) -> Result<Vec<Issue>, StoreError>;

    async fn insert(
        &self,
        draft: IssueDraft,
        created_on: DateTime<Utc>,
    ) -> Result<Issue, StoreError>;

    async fn update(
        &self,
        id: &IssueId,
        update: &IssueUpdate,
        updated_on: DateTime<Utc>,
    ) -> Result<Option<Issue>, StoreError>;

    async fn delete(&self, id: &IssueId) -> Result<Option<Issue>, StoreError>;
}

/// Mint an object-id shaped identifier: 16 hex digits of wall-clock nanos
/// followed by 8 hex digits of a per-store sequence. Ids therefore sort in
/// creation order and are never re-minted after a deletion.
pub(crate) fn mint_issue_id(seq: &AtomicU64) -> Result<IssueId, StoreError> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| StoreError(format!("clock before epoch: {e}")))?
        .as_nanos() as u64;
    let counter = seq.fetch_add(1, Ordering::Relaxed) & 0xffff_ffff;
    let raw = format!("{nanos:016x}{counter:08x}");
    IssueId::parse(&raw).map_err(|e| StoreError(format!("minted id rejected: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_ids_are_valid_unique_and_ordered() {
        let seq = AtomicU64::new(0);
        let a = mint_issue_id(&seq).expect("mint a");
        let b = mint_issue_id(&seq).expect("mint b");
        assert_eq!(a.as_str().len(), faultline_model::ID_HEX_LEN);
        assert_ne!(a, b);
        assert!(a < b);
    }
}
