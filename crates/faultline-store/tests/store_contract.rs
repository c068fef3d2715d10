// SPDX-License-Identifier: Apache-2.0

use chrono::{Duration, Utc};
use faultline_model::{IssueDraft, IssueId, IssueUpdate, ProjectName, ID_HEX_LEN};
use faultline_store::{IssueFilter, IssueStore, LocalFsStore, MemoryStore};
use std::collections::HashMap;

fn project(name: &str) -> ProjectName {
    ProjectName::parse(name).expect("project name")
}

fn draft(project_name: &str, title: &str, created_by: &str) -> IssueDraft {
    IssueDraft::new(
        project(project_name),
        title.to_string(),
        "Some text".to_string(),
        created_by.to_string(),
        None,
        None,
    )
    .expect("draft")
}

fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

async fn exercise_crud_contract(store: &dyn IssueStore) {
    let now = Utc::now();
    let a = store
        .insert(draft("alpha", "First", "Tester"), now)
        .await
        .expect("insert first");
    let b = store
        .insert(draft("alpha", "Second", "Someone"), now)
        .await
        .expect("insert second");
    store
        .insert(draft("beta", "Elsewhere", "Tester"), now)
        .await
        .expect("insert other project");

    assert_eq!(a.id.as_str().len(), ID_HEX_LEN);
    assert_ne!(a.id, b.id);
    assert!(a.open && b.open);
    assert_eq!(a.created_on, a.updated_on);

    // Bare project filter lists only that project, in creation order.
    let filter = IssueFilter::for_project(project("alpha"));
    let listed = store.find(&filter).await.expect("list alpha");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, a.id);
    assert_eq!(listed[1].id, b.id);

    // Typed intersection.
    let filter = IssueFilter::from_query(
        project("alpha"),
        &query(&[("open", "true"), ("created_by", "Tester")]),
    )
    .expect("filter");
    let listed = store.find(&filter).await.expect("filtered list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, a.id);

    // Partial update stamps updated_on and leaves everything else alone.
    let later = now + Duration::seconds(5);
    let update = IssueUpdate {
        issue_text: Some("revised".to_string()),
        open: Some(false),
        ..IssueUpdate::default()
    };
    let updated = store
        .update(&a.id, &update, later)
        .await
        .expect("update")
        .expect("updated issue exists");
    assert_eq!(updated.issue_text, "revised");
    assert!(!updated.open);
    assert_eq!(updated.issue_title, "First");
    assert_eq!(updated.created_on, a.created_on);
    assert!(updated.updated_on > a.updated_on);

    // Unknown id is Ok(None), not an error.
    let ghost = IssueId::parse(&"f".repeat(ID_HEX_LEN)).expect("ghost id");
    assert!(store
        .update(&ghost, &update, later)
        .await
        .expect("update ghost")
        .is_none());
    assert!(store.delete(&ghost).await.expect("delete ghost").is_none());

    // Delete is permanent and not repeatable.
    let deleted = store
        .delete(&b.id)
        .await
        .expect("delete")
        .expect("deleted issue exists");
    assert_eq!(deleted.id, b.id);
    assert!(store.delete(&b.id).await.expect("second delete").is_none());

    let remaining = store
        .find(&IssueFilter::for_project(project("alpha")))
        .await
        .expect("list after delete");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, a.id);

    // The other project never leaked in.
    let beta = store
        .find(&IssueFilter::for_project(project("beta")))
        .await
        .expect("list beta");
    assert_eq!(beta.len(), 1);
    assert_eq!(beta[0].issue_title, "Elsewhere");
}

#[tokio::test]
async fn memory_store_satisfies_crud_contract() {
    let store = MemoryStore::new();
    assert_eq!(store.backend_tag(), "memory");
    store.ping().await.expect("ping");
    exercise_crud_contract(&store).await;
}

#[tokio::test]
async fn local_fs_store_satisfies_crud_contract() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let store = LocalFsStore::new(tmp.path().join("issues"));
    assert_eq!(store.backend_tag(), "local-fs");
    store.ping().await.expect("ping");
    exercise_crud_contract(&store).await;
}

#[tokio::test]
async fn local_fs_store_round_trips_across_reopen() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("issues");

    let first = LocalFsStore::new(root.clone());
    first.ping().await.expect("ping");
    let issue = first
        .insert(draft("persist", "Survives restart", "Tester"), Utc::now())
        .await
        .expect("insert");
    drop(first);

    let reopened = LocalFsStore::new(root);
    let listed = reopened
        .find(&IssueFilter::for_project(project("persist")))
        .await
        .expect("list after reopen");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], issue);

    // Update through the reopened handle finds the document by id alone.
    let update = IssueUpdate {
        status_text: Some("triaged".to_string()),
        ..IssueUpdate::default()
    };
    let updated = reopened
        .update(&issue.id, &update, Utc::now())
        .await
        .expect("update after reopen")
        .expect("issue still present");
    assert_eq!(updated.status_text, "triaged");
}

#[tokio::test]
async fn local_fs_store_surfaces_corrupt_documents_as_errors() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("issues");
    let store = LocalFsStore::new(root.clone());
    store.ping().await.expect("ping");
    store
        .insert(draft("corrupt", "Fine", "Tester"), Utc::now())
        .await
        .expect("insert");

    let bogus = root.join("corrupt").join(format!("{}.json", "0".repeat(24)));
    std::fs::write(&bogus, b"not json").expect("plant corrupt file");

    let err = store
        .find(&IssueFilter::for_project(project("corrupt")))
        .await
        .expect_err("corrupt document should fail the listing");
    assert!(err.0.contains("decode"));
}

#[tokio::test]
async fn empty_project_listing_is_empty_not_an_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let store = LocalFsStore::new(tmp.path().join("issues"));
    let listed = store
        .find(&IssueFilter::for_project(project("nothing-here")))
        .await
        .expect("list");
    assert!(listed.is_empty());

    let memory = MemoryStore::new();
    let listed = memory
        .find(&IssueFilter::for_project(project("nothing-here")))
        .await
        .expect("list");
    assert!(listed.is_empty());
}
