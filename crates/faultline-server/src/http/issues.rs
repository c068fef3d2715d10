use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use faultline_api::{ActionAck, ApiFailure, CreateIssueBody, DeleteIssueBody, UpdateIssueBody};
use faultline_model::{Issue, IssueId, ProjectName};
use faultline_store::{IssueFilter, IssueStore, StoreError};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, warn};

use super::handlers::{propagated_request_id, with_request_id};
use crate::AppState;

const ROUTE: &str = "/api/issues/{project}";

// The issue resource answers HTTP 200 with a JSON body regardless of
// logical outcome; success and failure are distinguished in-body.

pub(crate) async fn list_issues_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(project): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let outcome: Result<Vec<Issue>, StoreError> = async {
        let project = ProjectName::parse(&project)
            .map_err(|e| StoreError(format!("invalid project: {e}")))?;
        let filter = IssueFilter::from_query(project, &params)?;
        state.store.find(&filter).await
    }
    .await;
    let (ok, resp) = match outcome {
        Ok(issues) => (true, Json(issues).into_response()),
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "issue listing failed");
            (false, Json(ApiFailure::retrieve_failed()).into_response())
        }
    };
    state
        .metrics
        .observe_request(ROUTE, ok, started.elapsed(), state.api.slow_request_threshold);
    with_request_id(resp, &request_id)
}

pub(crate) async fn create_issue_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(project): Path<String>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    // A malformed or absent body degrades to "all fields missing" so it
    // lands in the validation branch, never a framework-level rejection.
    let body: CreateIssueBody = serde_json::from_slice(&body).unwrap_or_default();

    let (ok, resp) = match ProjectName::parse(&project) {
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "issue create rejected project");
            (false, Json(ApiFailure::create_failed()).into_response())
        }
        Ok(project) => match body.into_draft(project) {
            Err(e) => {
                debug!(request_id = %request_id, error = %e, "issue create missing fields");
                (
                    false,
                    Json(ApiFailure::required_fields_missing()).into_response(),
                )
            }
            Ok(draft) => match state.store.insert(draft, Utc::now()).await {
                Ok(issue) => (true, Json(issue).into_response()),
                Err(e) => {
                    warn!(request_id = %request_id, error = %e, "issue create failed");
                    (false, Json(ApiFailure::create_failed()).into_response())
                }
            },
        },
    };
    state
        .metrics
        .observe_request(ROUTE, ok, started.elapsed(), state.api.slow_request_threshold);
    with_request_id(resp, &request_id)
}

pub(crate) async fn update_issue_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(_project): Path<String>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let body: UpdateIssueBody = serde_json::from_slice(&body).unwrap_or_default();

    let Some(raw_id) = body.submitted_id().map(str::to_string) else {
        let resp = Json(ApiFailure::missing_id()).into_response();
        state.metrics.observe_request(
            ROUTE,
            false,
            started.elapsed(),
            state.api.slow_request_threshold,
        );
        return with_request_id(resp, &request_id);
    };

    let update = body.into_update();
    let (ok, resp) = if update.is_empty() {
        (
            false,
            Json(ApiFailure::no_update_fields(raw_id)).into_response(),
        )
    } else {
        match IssueId::parse(&raw_id) {
            Err(e) => {
                debug!(request_id = %request_id, error = %e, "issue update id cast failed");
                (false, Json(ApiFailure::update_failed(raw_id)).into_response())
            }
            Ok(id) => match state.store.update(&id, &update, Utc::now()).await {
                Ok(Some(_)) => (true, Json(ActionAck::updated(raw_id)).into_response()),
                Ok(None) => (false, Json(ApiFailure::update_failed(raw_id)).into_response()),
                Err(e) => {
                    warn!(request_id = %request_id, error = %e, "issue update failed");
                    (false, Json(ApiFailure::update_failed(raw_id)).into_response())
                }
            },
        }
    };
    state
        .metrics
        .observe_request(ROUTE, ok, started.elapsed(), state.api.slow_request_threshold);
    with_request_id(resp, &request_id)
}

pub(crate) async fn delete_issue_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(_project): Path<String>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let body: DeleteIssueBody = serde_json::from_slice(&body).unwrap_or_default();

    let Some(raw_id) = body.submitted_id().map(str::to_string) else {
        let resp = Json(ApiFailure::missing_id()).into_response();
        state.metrics.observe_request(
            ROUTE,
            false,
            started.elapsed(),
            state.api.slow_request_threshold,
        );
        return with_request_id(resp, &request_id);
    };

    let (ok, resp) = match IssueId::parse(&raw_id) {
        Err(e) => {
            debug!(request_id = %request_id, error = %e, "issue delete id cast failed");
            (false, Json(ApiFailure::delete_failed(raw_id)).into_response())
        }
        Ok(id) => match state.store.delete(&id).await {
            Ok(Some(_)) => (true, Json(ActionAck::deleted(raw_id)).into_response()),
            Ok(None) => (false, Json(ApiFailure::delete_failed(raw_id)).into_response()),
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "issue delete failed");
                (false, Json(ApiFailure::delete_failed(raw_id)).into_response())
            }
        },
    };
    state
        .metrics
        .observe_request(ROUTE, ok, started.elapsed(), state.api.slow_request_threshold);
    with_request_id(resp, &request_id)
}
