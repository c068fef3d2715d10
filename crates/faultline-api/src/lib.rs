// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod bodies;
mod payloads;

pub use bodies::{CreateIssueBody, DeleteIssueBody, UpdateIssueBody};
pub use payloads::{ActionAck, ApiFailure};

pub const CRATE_NAME: &str = "faultline-api";
