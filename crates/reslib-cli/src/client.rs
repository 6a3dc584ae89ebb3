//! HTTP client for the running reslib server.
//!
//! Commands that read or change leasing state go through the server so that
//! its collection locks cover every write.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use reslib_api::error::ApiErrorResponse;
use reslib_core::config::AppConfig;
use reslib_core::error::{AppError, ErrorKind};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Success body: `{ success, data }`.
#[derive(Debug, serde::Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Thin JSON client over the `/v1` API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Client for an explicit base URL, e.g. `http://127.0.0.1:8080/v1`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "failed to build HTTP client", e)
            })?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Client for `server`, or for the configured bind address.
    pub fn from_config(config: &AppConfig, server: Option<&str>) -> Result<Self, AppError> {
        let root = match server {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let host = match config.server.host.as_str() {
                    "0.0.0.0" => "127.0.0.1",
                    "::" => "::1",
                    other => other,
                };
                if host.contains(':') {
                    format!("http://[{}]:{}", host, config.server.port)
                } else {
                    format!("http://{}:{}", host, config.server.port)
                }
            }
        };
        Self::new(format!("{}/v1", root))
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        self.send(self.http.get(self.url(path))).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    pub async fn put<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        self.send(self.http.put(self.url(path))).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        self.send(self.http.delete(self.url(path))).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = request.send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Internal,
                format!("cannot reach reslib server at {}", self.base_url),
                e,
            )
        })?;

        let status = response.status();
        if status.is_success() {
            let body: Envelope<T> = response.json().await.map_err(|e| {
                AppError::with_source(ErrorKind::Serialization, "unexpected server response", e)
            })?;
            return Ok(body.data);
        }

        let message = match response.json::<ApiErrorResponse>().await {
            Ok(body) => body.message,
            Err(_) => status.to_string(),
        };
        Err(error_for_status(status, message))
    }
}

/// Rebuild the domain error an API status stands for.
fn error_for_status(status: StatusCode, message: String) -> AppError {
    match status {
        StatusCode::BAD_REQUEST => AppError::validation(message),
        StatusCode::UNAUTHORIZED => AppError::unauthorized(message),
        StatusCode::NOT_FOUND => AppError::not_found(message),
        StatusCode::CONFLICT => AppError::conflict(message),
        _ => AppError::internal(message),
    }
}
