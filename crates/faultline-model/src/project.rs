use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::issue::ValidationError;

pub const PROJECT_MAX_LEN: usize = 64;

pub fn parse_project_name(input: &str) -> Result<ProjectName, ValidationError> {
    ProjectName::parse(input)
}

/// Free-text label scoping a group of issues. Not a first-class entity; the
/// filesystem backend maps each project to a directory, so path separators
/// and dot-names are rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct ProjectName(String);

impl ProjectName {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.is_empty() {
            return Err(ValidationError("project must not be empty".to_string()));
        }
        if input.len() > PROJECT_MAX_LEN {
            return Err(ValidationError(format!(
                "project exceeds max length {PROJECT_MAX_LEN}"
            )));
        }
        if input == "." || input == ".." {
            return Err(ValidationError(
                "project must not be a dot-name".to_string(),
            ));
        }
        if input
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '\0')
        {
            return Err(ValidationError(
                "project must not contain path separators or NUL".to_string(),
            ));
        }
        Ok(Self(input.to_string()))
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

impl Display for ProjectName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
