// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use faultline_model::{Issue, IssueDraft, IssueId, IssueUpdate, ProjectName};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicU64;
use tokio::sync::Mutex;

use crate::{mint_issue_id, IssueFilter, IssueStore, StoreError};

/// Filesystem backend: one JSON document per issue at
/// `<root>/<project>/<id>.json`. `ProjectName` validation guarantees a
/// project maps to a single directory component. Mutations go through an
/// internal lock to keep read-modify-write cycles whole; cross-process
/// writers get last-write-wins.
pub struct LocalFsStore {
    root: PathBuf,
    id_seq: AtomicU64,
    write_lock: Mutex<()>,
}

impl LocalFsStore {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            id_seq: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        }
    }

    fn project_dir(&self, project: &ProjectName) -> PathBuf {
        self.root.join(project.as_str())
    }

    fn issue_path(&self, project: &ProjectName, id: &IssueId) -> PathBuf {
        self.project_dir(project).join(format!("{id}.json"))
    }

    fn read_issue(path: &Path) -> Result<Issue, StoreError> {
        let bytes =
            fs::read(path).map_err(|e| StoreError(format!("read {}: {e}", path.display())))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| StoreError(format!("decode {}: {e}", path.display())))
    }

    fn write_issue(path: &Path, issue: &Issue) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(issue)
            .map_err(|e| StoreError(format!("encode issue {}: {e}", issue.id)))?;
        fs::write(path, bytes).map_err(|e| StoreError(format!("write {}: {e}", path.display())))
    }

    /// Issues address by id alone, so a lookup scans every project
    /// directory for `<id>.json`.
    fn locate(&self, id: &IssueId) -> Result<Option<PathBuf>, StoreError> {
        if !self.root.exists() {
            return Ok(None);
        }
        let entries = fs::read_dir(&self.root)
            .map_err(|e| StoreError(format!("read store root {}: {e}", self.root.display())))?;
        for entry in entries {
            let entry =
                entry.map_err(|e| StoreError(format!("read store root entry: {e}")))?;
            if !entry.path().is_dir() {
                continue;
            }
            let candidate = entry.path().join(format!("{id}.json"));
            if candidate.is_file() {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl IssueStore for LocalFsStore {
    fn backend_tag(&self) -> &'static str {
        "local-fs"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)
            .map_err(|e| StoreError(format!("store root unavailable {}: {e}", self.root.display())))
    }

    async fn find(&self, filter: &IssueFilter) -> Result<Vec<Issue>, StoreError> {
        let dir = self.project_dir(&filter.project);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&dir)
            .map_err(|e| StoreError(format!("read project dir {}: {e}", dir.display())))?;
        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError(format!("read project entry: {e}")))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        // File name is the minted id, so name order is creation order.
        paths.sort();
        let mut out = Vec::new();
        for path in paths {
            let issue = Self::read_issue(&path)?;
            if filter.matches(&issue) {
                out.push(issue);
            }
        }
        Ok(out)
    }

    async fn insert(
        &self,
        draft: IssueDraft,
        created_on: DateTime<Utc>,
    ) -> Result<Issue, StoreError> {
        let _guard = self.write_lock.lock().await;
        let dir = self.project_dir(&draft.project);
        fs::create_dir_all(&dir)
            .map_err(|e| StoreError(format!("create project dir {}: {e}", dir.display())))?;
        let id = mint_issue_id(&self.id_seq)?;
        let path = self.issue_path(&draft.project, &id);
        if path.exists() {
            return Err(StoreError(format!("id collision on insert: {id}")));
        }
        let issue = Issue::from_draft(draft, id, created_on);
        Self::write_issue(&path, &issue)?;
        Ok(issue)
    }

    async fn update(
        &self,
        id: &IssueId,
        update: &IssueUpdate,
        updated_on: DateTime<Utc>,
    ) -> Result<Option<Issue>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let Some(path) = self.locate(id)? else {
            return Ok(None);
        };
        let mut issue = Self::read_issue(&path)?;
        issue.apply_update(update, updated_on);
        Self::write_issue(&path, &issue)?;
        Ok(Some(issue))
    }

    async fn delete(&self, id: &IssueId) -> Result<Option<Issue>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let Some(path) = self.locate(id)? else {
            return Ok(None);
        };
        let issue = Self::read_issue(&path)?;
        fs::remove_file(&path)
            .map_err(|e| StoreError(format!("remove {}: {e}", path.display())))?;
        Ok(Some(issue))
    }
}
