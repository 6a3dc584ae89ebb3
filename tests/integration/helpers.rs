//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use reslib_api::{AppState, build_app};
use reslib_core::config::AppConfig;
use reslib_database::Stores;
use reslib_worker::ManualExpiryScheduler;

const SIGNING_KEY: &[u8] = b"integration-test-signing-key";

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Expiry jobs, fired by hand
    pub scheduler: Arc<ManualExpiryScheduler>,
    /// Shared state, for direct store access
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application over empty stores
    pub fn new() -> Self {
        let scheduler = Arc::new(ManualExpiryScheduler::new());
        let state = AppState::new(
            AppConfig::default(),
            Stores::in_memory(),
            scheduler.clone(),
            SIGNING_KEY,
        );
        let router = build_app(state.clone());

        Self {
            router,
            scheduler,
            state,
        }
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", token);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Create the "printer" template: a required `tickets` subresource and
    /// an optional `location` value.
    pub async fn create_printer_template(&self) -> String {
        let response = self
            .request(
                "POST",
                "/v1/template",
                Some(json!({
                    "name": "printer",
                    "description": "Shared printers",
                    "fields": [
                        { "key": "tickets", "type": "subresource", "required": true },
                        { "key": "location", "type": "value", "required": false },
                    ],
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.id()
    }

    /// Create a project, returning its id and API key
    pub async fn create_project(&self, name: &str) -> (String, String) {
        let response = self
            .request("POST", "/v1/project", Some(json!({ "name": name })), None)
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let api_key = response.data()["api_key"]
            .as_str()
            .expect("project has an api key")
            .to_string();
        (response.id(), api_key)
    }

    /// Create a printer resource associated with `projects`
    pub async fn create_printer(
        &self,
        template_id: &str,
        name: &str,
        projects: &[&str],
        tickets: i64,
    ) -> String {
        let response = self
            .request(
                "POST",
                "/v1/resource",
                Some(printer_body(template_id, name, projects, tickets)),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.id()
    }

    /// Open a session and return its bearer credential
    pub async fn open_session(&self, api_key: &str) -> String {
        let response = self
            .request("POST", "/v1/session", Some(json!({ "apikey": api_key })), None)
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.data()["token"]
            .as_str()
            .expect("session has a token")
            .to_string()
    }

    /// Fetch one resource from the listing
    pub async fn resource(&self, id: &str) -> Value {
        let response = self.request("GET", "/v1/resource", None, None).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response
            .data()
            .as_array()
            .and_then(|items| items.iter().find(|r| r["id"] == id))
            .cloned()
            .expect("resource is listed")
    }
}

/// A printer resource body in template order
pub fn printer_body(template_id: &str, name: &str, projects: &[&str], tickets: i64) -> Value {
    json!({
        "name": name,
        "templateid": template_id,
        "projects": projects,
        "fields": [
            { "key": "tickets", "type": "subresource", "required": true, "value": tickets },
            { "key": "location", "type": "value", "required": false, "value": "2nd floor" },
        ],
    })
}

/// The current `tickets` quantity of a resource document
pub fn tickets(resource: &Value) -> i64 {
    resource["fields"]
        .as_array()
        .and_then(|fields| fields.iter().find(|f| f["key"] == "tickets"))
        .and_then(|f| f["value"].as_i64())
        .expect("resource has a tickets field")
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `id` of the returned document
    pub fn id(&self) -> String {
        self.data()["id"]
            .as_str()
            .expect("document has an id")
            .to_string()
    }

    /// The error code of a failure body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
