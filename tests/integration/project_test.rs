//! Project endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_project_create_issues_api_key() {
    let app = TestApp::new();
    let (id, api_key) = app.create_project("lab").await;

    assert_eq!(id.len(), 24);
    assert!(!api_key.is_empty());

    let response = app.request("GET", "/v1/project", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data().as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_blank_project_name_is_rejected() {
    let app = TestApp::new();
    let response = app
        .request("POST", "/v1/project", Some(json!({ "name": "" })), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_project_name_conflicts() {
    let app = TestApp::new();
    app.create_project("lab").await;
    let response = app
        .request("POST", "/v1/project", Some(json!({ "name": "lab" })), None)
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.body["message"],
        "project with this name already exists"
    );
}

#[tokio::test]
async fn test_rotate_key_invalidates_old_key() {
    let app = TestApp::new();
    let (id, old_key) = app.create_project("lab").await;

    let response = app
        .request("PUT", &format!("/v1/project/{id}/newkey"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let new_key = response.data()["api_key"].as_str().expect("key").to_string();
    assert_ne!(new_key, old_key);

    let response = app
        .request("POST", "/v1/session", Some(json!({ "apikey": old_key })), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    app.open_session(&new_key).await;
}

#[tokio::test]
async fn test_project_update_renames() {
    let app = TestApp::new();
    let (id, _) = app.create_project("lab").await;
    app.create_project("office").await;

    let response = app
        .request(
            "PUT",
            &format!("/v1/project/{id}"),
            Some(json!({ "name": "office" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request(
            "PUT",
            &format!("/v1/project/{id}"),
            Some(json!({ "name": "workshop" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["name"], "workshop");
}

#[tokio::test]
async fn test_project_delete_removes_orphaned_resources() {
    let app = TestApp::new();
    let template = app.create_printer_template().await;
    let (lab, _) = app.create_project("lab").await;
    let (office, _) = app.create_project("office").await;

    let only_lab = app.create_printer(&template, "lab-printer", &[&lab], 3).await;
    let shared = app
        .create_printer(&template, "shared-printer", &[&lab, &office], 3)
        .await;

    let response = app
        .request("DELETE", &format!("/v1/project/{lab}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["message"], "project deleted successfully");

    let remaining = app.request("GET", "/v1/resource", None, None).await;
    let ids: Vec<&str> = remaining
        .data()
        .as_array()
        .expect("list")
        .iter()
        .filter_map(|r| r["id"].as_str())
        .collect();
    assert_eq!(ids, vec![shared.as_str()]);
    assert!(!ids.contains(&only_lab.as_str()));

    let shared_doc = app.resource(&shared).await;
    assert_eq!(shared_doc["projects"], json!([office]));
}
