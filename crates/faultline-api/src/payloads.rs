// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Success acknowledgement for update/delete. The mutated document itself
/// is never returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionAck {
    pub result: String,
    #[serde(rename = "_id")]
    pub id: String,
}

impl ActionAck {
    #[must_use]
    pub fn updated(id: String) -> Self {
        Self {
            result: "successfully updated".to_string(),
            id,
        }
    }

    #[must_use]
    pub fn deleted(id: String) -> Self {
        Self {
            result: "successfully deleted".to_string(),
            id,
        }
    }
}

/// In-body failure payload. One message per validation cause; one collapsed
/// message per operation for store failures, with the cause kept out of the
/// client-facing shape. Update/delete failures echo the submitted id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailure {
    pub error: String,
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
}

impl ApiFailure {
    #[must_use]
    pub fn retrieve_failed() -> Self {
        Self {
            error: "could not retrieve issues".to_string(),
            id: None,
        }
    }

    #[must_use]
    pub fn required_fields_missing() -> Self {
        Self {
            error: "required field(s) missing".to_string(),
            id: None,
        }
    }

    #[must_use]
    pub fn create_failed() -> Self {
        Self {
            error: "could not create issue".to_string(),
            id: None,
        }
    }

    #[must_use]
    pub fn missing_id() -> Self {
        Self {
            error: "missing _id".to_string(),
            id: None,
        }
    }

    #[must_use]
    pub fn no_update_fields(id: String) -> Self {
        Self {
            error: "no update field(s) sent".to_string(),
            id: Some(id),
        }
    }

    #[must_use]
    pub fn update_failed(id: String) -> Self {
        Self {
            error: "could not update".to_string(),
            id: Some(id),
        }
    }

    #[must_use]
    pub fn delete_failed(id: String) -> Self {
        Self {
            error: "could not delete".to_string(),
            id: Some(id),
        }
    }
}
