// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use faultline_model::{Issue, IssueId, ProjectName};
use std::collections::HashMap;

use crate::StoreError;

/// Field-equality constraints for a listing, AND-combined. Construction is
/// an enumerated policy: recognized keys become typed predicates, a value
/// that fails its typed parse is a cast failure, and unrecognized keys are
/// carried as opaque pairs that can never match a stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct IssueFilter {
    pub project: ProjectName,
    pub id: Option<IssueId>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
    pub created_on: Option<DateTime<Utc>>,
    pub updated_on: Option<DateTime<Utc>>,
    pub opaque: Vec<(String, String)>,
}

impl IssueFilter {
    #[must_use]
    pub fn for_project(project: ProjectName) -> Self {
        Self {
            project,
            id: None,
            issue_title: None,
            issue_text: None,
            created_by: None,
            assigned_to: None,
            status_text: None,
            open: None,
            created_on: None,
            updated_on: None,
            opaque: Vec::new(),
        }
    }

    /// Merge query pairs onto the path project. A query-supplied `project`
    /// replaces the path value, mirroring the original merge order.
    pub fn from_query(
        project: ProjectName,
        params: &HashMap<String, String>,
    ) -> Result<Self, StoreError> {
        let mut filter = Self::for_project(project);
        for (key, value) in params {
            match key.as_str() {
                "project" => {
                    filter.project = ProjectName::parse(value)
                        .map_err(|e| StoreError(format!("filter cast failed for project: {e}")))?;
                }
                "_id" => {
                    filter.id = Some(
                        IssueId::parse(value)
                            .map_err(|e| StoreError(format!("filter cast failed for _id: {e}")))?,
                    );
                }
                "open" => {
                    filter.open = Some(parse_open(value)?);
                }
                "created_on" => {
                    filter.created_on = Some(parse_timestamp("created_on", value)?);
                }
                "updated_on" => {
                    filter.updated_on = Some(parse_timestamp("updated_on", value)?);
                }
                "issue_title" => filter.issue_title = Some(value.clone()),
                "issue_text" => filter.issue_text = Some(value.clone()),
                "created_by" => filter.created_by = Some(value.clone()),
                "assigned_to" => filter.assigned_to = Some(value.clone()),
                "status_text" => filter.status_text = Some(value.clone()),
                _ => filter.opaque.push((key.clone(), value.clone())),
            }
        }
        Ok(filter)
    }

    /// Exact-match AND semantics. Documents have a closed schema, so any
    /// opaque pair disqualifies every document.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        if !self.opaque.is_empty() {
            return false;
        }
        if issue.project != self.project {
            return false;
        }
        if self.id.as_ref().is_some_and(|v| *v != issue.id) {
            return false;
        }
        if self
            .issue_title
            .as_ref()
            .is_some_and(|v| *v != issue.issue_title)
        {
            return false;
        }
        if self
            .issue_text
            .as_ref()
            .is_some_and(|v| *v != issue.issue_text)
        {
            return false;
        }
        if self
            .created_by
            .as_ref()
            .is_some_and(|v| *v != issue.created_by)
        {
            return false;
        }
        if self
            .assigned_to
            .as_ref()
            .is_some_and(|v| *v != issue.assigned_to)
        {
            return false;
        }
        if self
            .status_text
            .as_ref()
            .is_some_and(|v| *v != issue.status_text)
        {
            return false;
        }
        if self.open.is_some_and(|v| v != issue.open) {
            return false;
        }
        if self.created_on.is_some_and(|v| v != issue.created_on) {
            return false;
        }
        if self.updated_on.is_some_and(|v| v != issue.updated_on) {
            return false;
        }
        true
    }
}

fn parse_open(value: &str) -> Result<bool, StoreError> {
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(StoreError(format!("filter cast failed for open: {value}")))
    }
}

fn parse_timestamp(key: &str, value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError(format!("filter cast failed for {key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use faultline_model::{IssueDraft, ID_HEX_LEN};

    fn project() -> ProjectName {
        ProjectName::parse("apitest").expect("project")
    }

    fn issue(open: bool, created_by: &str) -> Issue {
        let draft = IssueDraft::new(
            project(),
            "Title".to_string(),
            "Text".to_string(),
            created_by.to_string(),
            None,
            None,
        )
        .expect("draft");
        let id = IssueId::parse(&"a".repeat(ID_HEX_LEN)).expect("id");
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut issue = Issue::from_draft(draft, id, now);
        issue.open = open;
        issue
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn bare_project_filter_matches_everything_in_project() {
        let filter = IssueFilter::from_query(project(), &HashMap::new()).expect("filter");
        assert!(filter.matches(&issue(true, "Tester")));
        assert!(filter.matches(&issue(false, "Someone")));
    }

    #[test]
    fn typed_and_text_predicates_intersect() {
        let filter =
            IssueFilter::from_query(project(), &query(&[("open", "true"), ("created_by", "Tester")]))
                .expect("filter");
        assert!(filter.matches(&issue(true, "Tester")));
        assert!(!filter.matches(&issue(false, "Tester")));
        assert!(!filter.matches(&issue(true, "Someone")));
    }

    #[test]
    fn open_accepts_flag_spellings_and_rejects_junk() {
        for raw in ["true", "TRUE", "1"] {
            let filter =
                IssueFilter::from_query(project(), &query(&[("open", raw)])).expect("filter");
            assert_eq!(filter.open, Some(true));
        }
        let filter =
            IssueFilter::from_query(project(), &query(&[("open", "false")])).expect("filter");
        assert_eq!(filter.open, Some(false));
        assert!(IssueFilter::from_query(project(), &query(&[("open", "banana")])).is_err());
    }

    #[test]
    fn malformed_id_is_a_cast_failure() {
        assert!(IssueFilter::from_query(project(), &query(&[("_id", "invalidid123")])).is_err());
    }

    #[test]
    fn unknown_keys_match_no_document() {
        let filter =
            IssueFilter::from_query(project(), &query(&[("priority", "high")])).expect("filter");
        assert!(!filter.matches(&issue(true, "Tester")));
    }

    #[test]
    fn query_project_replaces_path_project() {
        let filter =
            IssueFilter::from_query(project(), &query(&[("project", "other")])).expect("filter");
        assert_eq!(filter.project.as_str(), "other");
        assert!(!filter.matches(&issue(true, "Tester")));
    }
}
