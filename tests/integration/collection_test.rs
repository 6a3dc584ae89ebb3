//! Read-only collection browser.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_collection_dump_and_fetch() {
    let app = TestApp::new();
    let template_id = app.create_printer_template().await;
    let (project_id, api_key) = app.create_project("lab").await;
    let printer = app
        .create_printer(&template_id, "printer", &[&project_id], 3)
        .await;
    app.open_session(&api_key).await;

    let response = app.request("GET", "/v1/collections/resources", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let resources = response.data().as_array().expect("list");
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0]["id"], printer.as_str());

    let response = app.request("GET", "/v1/collections/sessions", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let sessions = response.data().as_array().expect("list");
    assert_eq!(sessions.len(), 1);
    let session_id = sessions[0]["id"].as_str().expect("session id").to_string();

    let response = app
        .request("GET", &format!("/v1/collections/sessions/{}", session_id), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["project"], project_id.as_str());

    let response = app
        .request("GET", &format!("/v1/collections/templates/{}", template_id), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["name"], "printer");
}

#[tokio::test]
async fn test_empty_collection_is_an_empty_list() {
    let app = TestApp::new();
    let response = app.request("GET", "/v1/collections/templates", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data().as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_unknown_collection_or_document() {
    let app = TestApp::new();

    let response = app.request("GET", "/v1/collections/settings", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "collection not found");

    let response = app
        .request("GET", "/v1/collections/projects/0123456789abcdef01234567", None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "project not found");

    let response = app
        .request("GET", "/v1/collections/projects/nope", None, None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
