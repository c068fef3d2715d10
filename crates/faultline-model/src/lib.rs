#![forbid(unsafe_code)]
//! Faultline model SSOT.

mod issue;
mod project;

pub use issue::{
    parse_issue_id, Issue, IssueDraft, IssueId, IssueUpdate, ValidationError, ID_HEX_LEN,
};
pub use project::{parse_project_name, ProjectName, PROJECT_MAX_LEN};

pub const CRATE_NAME: &str = "faultline-model";
