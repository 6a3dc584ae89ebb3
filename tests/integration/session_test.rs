//! Session lifecycle, checkout and subresource endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{TestApp, tickets};

struct Lab {
    app: TestApp,
    resource: String,
    token: String,
}

/// A project with one printer holding `quantity` tickets and an open session.
async fn lab(quantity: i64) -> Lab {
    let app = TestApp::new();
    let template = app.create_printer_template().await;
    let (project, api_key) = app.create_project("lab").await;
    let resource = app
        .create_printer(&template, "p1", &[&project], quantity)
        .await;
    let token = app.open_session(&api_key).await;
    Lab {
        app,
        resource,
        token,
    }
}

impl Lab {
    async fn put(&self, path: &str) -> crate::helpers::TestResponse {
        self.app
            .request("PUT", path, None, Some(&self.token))
            .await
    }

    async fn check_out(&self) -> crate::helpers::TestResponse {
        self.put(&format!("/v1/session/authorized/checkout/{}", self.resource))
            .await
    }

    async fn consume(&self) -> crate::helpers::TestResponse {
        self.put(&format!(
            "/v1/session/authorized/checkout/{}/tickets",
            self.resource
        ))
        .await
    }

    async fn release(&self) -> crate::helpers::TestResponse {
        self.put(&format!(
            "/v1/session/authorized/checkin/{}/tickets",
            self.resource
        ))
        .await
    }
}

#[tokio::test]
async fn test_session_create_schedules_expiry() {
    let lab = lab(1).await;

    assert!(lab.token.starts_with("Bearer "));
    assert_eq!(lab.app.scheduler.pending().await.len(), 1);

    let response = lab.app.request("GET", "/v1/session", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data().as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_unknown_api_key_is_not_found() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/v1/session",
            Some(json!({ "apikey": "nope" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_authorized_routes_require_bearer() {
    let lab = lab(1).await;
    let path = format!("/v1/session/authorized/checkout/{}", lab.resource);

    let response = lab.app.request("PUT", &path, None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = lab
        .app
        .request("PUT", &path, None, Some("Bearer not.a.jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_checkout_consume_release_checkin() {
    let lab = lab(3).await;

    let response = lab.check_out().await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["checked_out"], 1);

    let response = lab.check_out().await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = lab.consume().await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["remaining"], 2);
    assert_eq!(response.data()["held"], 1);

    let response = lab.consume().await;
    assert_eq!(response.data()["remaining"], 1);
    assert_eq!(response.data()["held"], 2);

    let response = lab.release().await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["remaining"], 2);
    assert_eq!(response.data()["held"], 1);

    let response = lab
        .put(&format!("/v1/session/authorized/checkin/{}", lab.resource))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["message"], "checked in");

    let doc = lab.app.resource(&lab.resource).await;
    assert_eq!(tickets(&doc), 3);
    assert_eq!(doc["checked_out"], 0);
}

#[tokio::test]
async fn test_consume_requires_checkout_and_stock() {
    let lab = lab(1).await;

    let response = lab.consume().await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    lab.check_out().await;
    assert_eq!(lab.consume().await.status, StatusCode::OK);

    let response = lab.consume().await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], "subresource already depleted");

    let response = lab
        .put(&format!(
            "/v1/session/authorized/checkout/{}/ink",
            lab.resource
        ))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_release_without_consumption_is_unauthorized() {
    let lab = lab(2).await;
    lab.check_out().await;

    let response = lab.release().await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_close_session_returns_everything() {
    let lab = lab(2).await;
    lab.check_out().await;
    lab.consume().await;
    lab.consume().await;

    let response = lab
        .app
        .request("DELETE", "/v1/session/authorized", None, Some(&lab.token))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["message"], "session terminated");
    assert_eq!(response.data()["report"]["released_resources"], 1);
    assert_eq!(response.data()["report"]["released_units"], 2);

    let doc = lab.app.resource(&lab.resource).await;
    assert_eq!(tickets(&doc), 2);
    assert_eq!(doc["checked_out"], 0);

    assert!(lab.app.scheduler.pending().await.is_empty());

    let response = lab.check_out().await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expiry_releases_holdings() {
    let lab = lab(4).await;
    lab.check_out().await;
    lab.consume().await;

    assert_eq!(lab.app.scheduler.fire_all().await, 1);

    let doc = lab.app.resource(&lab.resource).await;
    assert_eq!(tickets(&doc), 4);
    assert_eq!(doc["checked_out"], 0);

    let response = lab.app.request("GET", "/v1/session", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_renew_replaces_expiry_job() {
    let lab = lab(1).await;
    let before = lab.app.scheduler.pending().await;

    let response = lab.put("/v1/session/authorized").await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert!(response.data()["token"]
        .as_str()
        .is_some_and(|t| t.starts_with("Bearer ")));

    let after = lab.app.scheduler.pending().await;
    assert_eq!(after.len(), 1);
    assert_ne!(before, after);
}

#[tokio::test]
async fn test_close_session_by_id() {
    let lab = lab(1).await;
    let listed = lab.app.request("GET", "/v1/session", None, None).await;
    let id = listed.data()[0]["id"].as_str().expect("id").to_string();

    let response = lab
        .app
        .request("DELETE", &format!("/v1/session/{id}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = lab
        .app
        .request("DELETE", &format!("/v1/session/{id}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_resource_is_reported_on_close() {
    let lab = lab(2).await;
    lab.check_out().await;

    let response = lab
        .app
        .request("DELETE", &format!("/v1/resource/{}", lab.resource), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = lab
        .app
        .request("DELETE", "/v1/session/authorized", None, Some(&lab.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let failures = response.data()["report"]["failures"]
        .as_array()
        .expect("failures");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["kind"], "missing_resource");
}
