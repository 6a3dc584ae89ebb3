//! Template endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_template_create_and_list() {
    let app = TestApp::new();
    let id = app.create_printer_template().await;

    let response = app.request("GET", "/v1/template", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let templates = response.data().as_array().expect("list");
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0]["id"], id.as_str());
    assert_eq!(templates[0]["fields"][0]["type"], "subresource");
}

#[tokio::test]
async fn test_empty_template_list_is_not_found() {
    let app = TestApp::new();
    let response = app.request("GET", "/v1/template", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_duplicate_template_name_conflicts() {
    let app = TestApp::new();
    app.create_printer_template().await;

    let response = app
        .request(
            "POST",
            "/v1/template",
            Some(json!({
                "name": "printer",
                "fields": [{ "key": "pages", "type": "value" }],
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.body["message"],
        "template with this name already exists"
    );
}

#[tokio::test]
async fn test_template_without_fields_is_rejected() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/v1/template",
            Some(json!({ "name": "empty", "fields": [] })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_REQUEST");
}

#[tokio::test]
async fn test_template_update_and_delete() {
    let app = TestApp::new();
    let id = app.create_printer_template().await;

    let response = app
        .request(
            "PUT",
            &format!("/v1/template/{id}"),
            Some(json!({
                "name": "plotter",
                "fields": [{ "key": "sheets", "type": "subresource", "required": true }],
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["name"], "plotter");

    let response = app
        .request("DELETE", &format!("/v1/template/{id}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.data()["message"],
        "template deleted successfully"
    );

    let response = app
        .request("DELETE", &format!("/v1/template/{id}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_template_id_is_bad_request() {
    let app = TestApp::new();
    let response = app
        .request("DELETE", "/v1/template/not-an-id", None, None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_REQUEST");
}
