//! Resource endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{TestApp, printer_body, tickets};

#[tokio::test]
async fn test_resource_create_links_projects() {
    let app = TestApp::new();
    let template = app.create_printer_template().await;
    let (lab, _) = app.create_project("lab").await;

    let id = app.create_printer(&template, "p1", &[&lab], 5).await;

    let doc = app.resource(&id).await;
    assert_eq!(tickets(&doc), 5);
    assert_eq!(doc["checked_out"], 0);
    assert_eq!(doc["active"], true);

    let response = app
        .request("GET", &format!("/v1/resource/{lab}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()[0]["id"], id.as_str());
}

#[tokio::test]
async fn test_resource_structure_must_match_template() {
    let app = TestApp::new();
    let template = app.create_printer_template().await;
    let (lab, _) = app.create_project("lab").await;

    let response = app
        .request(
            "POST",
            "/v1/resource",
            Some(json!({
                "name": "p1",
                "templateid": template,
                "projects": [lab],
                "fields": [
                    { "key": "location", "type": "value", "value": "basement" },
                    { "key": "tickets", "type": "subresource", "required": true, "value": 1 },
                ],
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resource_rejects_unknown_and_duplicate_projects() {
    let app = TestApp::new();
    let template = app.create_printer_template().await;
    let (lab, _) = app.create_project("lab").await;

    let response = app
        .request(
            "POST",
            "/v1/resource",
            Some(printer_body(&template, "p1", &[&lab, &lab], 1)),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "duplicate project ids not allowed");

    let response = app
        .request(
            "POST",
            "/v1/resource",
            Some(printer_body(&template, "p1", &["0123456789abcdef01234567"], 1)),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resource_update_reconciles_projects() {
    let app = TestApp::new();
    let template = app.create_printer_template().await;
    let (lab, _) = app.create_project("lab").await;
    let (office, _) = app.create_project("office").await;
    let id = app.create_printer(&template, "p1", &[&lab], 2).await;

    let mut body = printer_body(&template, "p1", &[&office], 7);
    body["active"] = json!(false);
    let response = app
        .request("PUT", &format!("/v1/resource/{id}"), Some(body), None)
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(tickets(response.data()), 7);
    assert_eq!(response.data()["active"], false);

    let response = app
        .request("GET", &format!("/v1/resource/{lab}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("GET", &format!("/v1/resource/{office}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()[0]["id"], id.as_str());
}

#[tokio::test]
async fn test_checked_out_resource_cannot_be_updated() {
    let app = TestApp::new();
    let template = app.create_printer_template().await;
    let (lab, api_key) = app.create_project("lab").await;
    let id = app.create_printer(&template, "p1", &[&lab], 2).await;

    let token = app.open_session(&api_key).await;
    let response = app
        .request(
            "PUT",
            &format!("/v1/session/authorized/checkout/{id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "PUT",
            &format!("/v1/resource/{id}"),
            Some(printer_body(&template, "p1", &[&lab], 9)),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.body["message"],
        "resource is checked out; cannot update a checked out resource"
    );
}

#[tokio::test]
async fn test_resource_delete_unlinks_projects() {
    let app = TestApp::new();
    let template = app.create_printer_template().await;
    let (lab, _) = app.create_project("lab").await;
    let id = app.create_printer(&template, "p1", &[&lab], 2).await;

    let response = app
        .request("DELETE", &format!("/v1/resource/{id}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["message"], "resource deleted successfully");
    assert_eq!(response.data()["cascade"]["updated_projects"], json!([lab]));

    let projects = app.request("GET", "/v1/project", None, None).await;
    assert_eq!(projects.data()[0]["resources"], json!([]));
}
