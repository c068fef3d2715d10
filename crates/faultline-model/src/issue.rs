use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::project::ProjectName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub const ID_HEX_LEN: usize = 24;

pub fn parse_issue_id(input: &str) -> Result<IssueId, ValidationError> {
    IssueId::parse(input)
}

/// Opaque store-assigned identifier: exactly 24 hex digits, object-id
/// shaped. Stored lowercased so id order equals mint order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct IssueId(String);

impl IssueId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.len() != ID_HEX_LEN {
            return Err(ValidationError(format!(
                "issue id must be exactly {ID_HEX_LEN} hex digits"
            )));
        }
        if !input.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError(
                "issue id must contain only hex digits".to_string(),
            ));
        }
        Ok(Self(input.to_ascii_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for IssueId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The sole persisted entity. The identifier travels as `_id` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Issue {
    #[serde(rename = "_id")]
    pub id: IssueId,
    pub project: ProjectName,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    pub open: bool,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

impl Issue {
    /// Materialize a validated draft once the store has minted an id.
    /// `created_on == updated_on` at birth, `open` starts true.
    #[must_use]
    pub fn from_draft(draft: IssueDraft, id: IssueId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            project: draft.project,
            issue_title: draft.issue_title,
            issue_text: draft.issue_text,
            created_by: draft.created_by,
            assigned_to: draft.assigned_to,
            status_text: draft.status_text,
            open: true,
            created_on: now,
            updated_on: now,
        }
    }

    /// Apply a partial update and stamp `updated_on`. `project` and
    /// `created_on` are immutable by construction of `IssueUpdate`.
    pub fn apply_update(&mut self, update: &IssueUpdate, now: DateTime<Utc>) {
        if let Some(v) = &update.issue_title {
            self.issue_title = v.clone();
        }
        if let Some(v) = &update.issue_text {
            self.issue_text = v.clone();
        }
        if let Some(v) = &update.created_by {
            self.created_by = v.clone();
        }
        if let Some(v) = &update.assigned_to {
            self.assigned_to = v.clone();
        }
        if let Some(v) = &update.status_text {
            self.status_text = v.clone();
        }
        if let Some(v) = update.open {
            self.open = v;
        }
        self.updated_on = now;
    }
}

/// A validated create request, before the store assigns an id. Required
/// fields reject the empty string; whitespace-only input counts as present.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct IssueDraft {
    pub project: ProjectName,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
}

impl IssueDraft {
    pub fn new(
        project: ProjectName,
        issue_title: String,
        issue_text: String,
        created_by: String,
        assigned_to: Option<String>,
        status_text: Option<String>,
    ) -> Result<Self, ValidationError> {
        if issue_title.is_empty() {
            return Err(ValidationError("issue_title must not be empty".to_string()));
        }
        if issue_text.is_empty() {
            return Err(ValidationError("issue_text must not be empty".to_string()));
        }
        if created_by.is_empty() {
            return Err(ValidationError("created_by must not be empty".to_string()));
        }
        Ok(Self {
            project,
            issue_title,
            issue_text,
            created_by,
            assigned_to: assigned_to.unwrap_or_default(),
            status_text: status_text.unwrap_or_default(),
        })
    }
}

/// The editable-field subset of a PUT. `None` means "leave unchanged";
/// empty strings were dropped upstream, so a surviving `Some` is a real
/// change request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueUpdate {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
}

impl IssueUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issue_title.is_none()
            && self.issue_text.is_none()
            && self.created_by.is_none()
            && self.assigned_to.is_none()
            && self.status_text.is_none()
            && self.open.is_none()
    }
}
