// SPDX-License-Identifier: Apache-2.0

use faultline_model::{IssueDraft, IssueUpdate, ProjectName, ValidationError};
use serde::{Deserialize, Deserializer};

/// POST body. Every field is optional at parse time; requiredness is a
/// validation concern, not a deserialization one, so an absent or malformed
/// body degrades to "fields missing" instead of a framework rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateIssueBody {
    #[serde(default)]
    pub issue_title: Option<String>,
    #[serde(default)]
    pub issue_text: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub status_text: Option<String>,
}

impl CreateIssueBody {
    pub fn into_draft(self, project: ProjectName) -> Result<IssueDraft, ValidationError> {
        IssueDraft::new(
            project,
            self.issue_title.unwrap_or_default(),
            self.issue_text.unwrap_or_default(),
            self.created_by.unwrap_or_default(),
            self.assigned_to,
            self.status_text,
        )
    }
}

/// PUT body: `_id` plus any editable fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIssueBody {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub issue_title: Option<String>,
    #[serde(default)]
    pub issue_text: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub status_text: Option<String>,
    #[serde(default, deserialize_with = "open_flag")]
    pub open: Option<bool>,
}

impl UpdateIssueBody {
    /// The submitted id, with the empty string counting as absent.
    #[must_use]
    pub fn submitted_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|s| !s.is_empty())
    }

    /// Explicit pre-processing step: empty-string fields are "not actually
    /// requesting a change" and are filtered out before emptiness is judged.
    #[must_use]
    pub fn into_update(self) -> IssueUpdate {
        IssueUpdate {
            issue_title: drop_empty(self.issue_title),
            issue_text: drop_empty(self.issue_text),
            created_by: drop_empty(self.created_by),
            assigned_to: drop_empty(self.assigned_to),
            status_text: drop_empty(self.status_text),
            open: self.open,
        }
    }
}

/// DELETE body: `_id` only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteIssueBody {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
}

impl DeleteIssueBody {
    #[must_use]
    pub fn submitted_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|s| !s.is_empty())
    }
}

fn drop_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Accept `open` as a JSON bool or its common string spellings; anything
/// else (including the empty string) is treated as not sent.
fn open_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Flag(b)) => Some(b),
        Some(Raw::Text(s)) => {
            if s == "1" || s.eq_ignore_ascii_case("true") {
                Some(true)
            } else if s == "0" || s.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        None => None,
    })
}
