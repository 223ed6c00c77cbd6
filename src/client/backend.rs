//! HTTP client for the FastAPI backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::AuthApi;
use super::models::{AccessToken, Credentials, Message, NewPassword, Registration, UserProfile};
use crate::error::{ApiError, ApiResult};
use crate::store::Token;

/// Path prefix of the versioned API
const API_PREFIX: &str = "/api/v1";

/// Per-request ceiling; session validation applies its own, shorter bound on top
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend API client
pub struct BackendClient {
    http: HttpClient,
    base_url: String,
}

impl BackendClient {
    /// Create a client for the backend at `api_host` (e.g. `http://localhost:8000`)
    pub fn new(api_host: &str) -> ApiResult<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("sessiongate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: format!("{}{}", api_host.trim_end_matches('/'), API_PREFIX),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode a successful JSON body
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();
        log::debug!("{} {}", status.as_u16(), response.url().path());

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
            });
        }

        Err(error_for_status(status, response).await)
    }
}

/// Map a non-success response onto the error taxonomy
async fn error_for_status(status: StatusCode, response: Response) -> ApiError {
    let body = response.text().await.unwrap_or_default();
    let detail = detail_message(&body);

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden,
        StatusCode::NOT_FOUND => {
            ApiError::NotFound(detail.unwrap_or_else(|| "Resource not found".to_string()))
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY | StatusCode::CONFLICT => {
            ApiError::BadRequest(detail.unwrap_or_else(|| "Bad request".to_string()))
        }
        status if status.is_server_error() => {
            ApiError::ServerError(detail.unwrap_or_else(|| format!("Server error: {}", status)))
        }
        _ => ApiError::InvalidResponse(format!("Unexpected status code: {}", status)),
    }
}

/// Extract FastAPI's `detail` field.
///
/// `HTTPException` produces `{"detail": "..."}`; request validation produces
/// `{"detail": [{"loc": [...], "msg": "...", "type": "..."}]}`.
fn detail_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(message) => Some(message.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[async_trait]
impl AuthApi for BackendClient {
    async fn login(&self, credentials: &Credentials) -> ApiResult<AccessToken> {
        // OAuth2 password flow: form-encoded, email goes in `username`
        let request = self.http.post(self.url("/login/access-token")).form(&[
            ("username", credentials.email.as_str()),
            ("password", credentials.password.as_str()),
        ]);
        self.send(request).await
    }

    async fn current_user(&self, token: &Token) -> ApiResult<UserProfile> {
        let request = self
            .http
            .get(self.url("/users/me"))
            .bearer_auth(token.as_str());
        self.send(request).await
    }

    async fn register_user(&self, registration: &Registration) -> ApiResult<UserProfile> {
        let request = self.http.post(self.url("/users/signup")).json(registration);
        self.send(request).await
    }

    async fn recover_password(&self, email: &str) -> ApiResult<Message> {
        // Single percent-encoded path segment
        let mut url = reqwest::Url::parse(&self.url("/password-recovery"))
            .map_err(|e| ApiError::Network(format!("Invalid API host: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Network("Invalid API host".to_string()))?
            .push(email);
        self.send(self.http.post(url)).await
    }

    async fn reset_password(&self, request: &NewPassword) -> ApiResult<Message> {
        let request = self.http.post(self.url("/reset-password/")).json(request);
        self.send(request).await
    }
}
