//! Mock backend client for testing
//!
//! Provides a mock implementation of [`AuthApi`] for unit testing without
//! making real API calls.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

use super::AuthApi;
use super::models::{AccessToken, Credentials, Message, NewPassword, Registration, UserProfile};
use crate::error::{ApiError, ApiResult};
use crate::store::Token;

/// Mock API client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockBackendClient::new()
///     .with_user(UserProfile::new("u1", "a@b.com"))
///     .await;
///
/// let user = mock.current_user(&Token::new("abc123")).await?;
/// assert_eq!(user.id, "u1");
/// ```
#[derive(Default)]
pub struct MockBackendClient {
    /// Profile returned from current_user and register_user
    user: Arc<Mutex<Option<UserProfile>>>,
    /// Token returned from login
    token: Arc<Mutex<Option<AccessToken>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Error returned from current_user on every call
    user_error: Arc<Mutex<Option<ApiError>>>,
    /// When set, current_user waits for a notification before answering
    current_user_gate: Arc<Mutex<Option<Arc<Notify>>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Tokens presented to current_user, in call order
    seen_tokens: Arc<Mutex<Vec<String>>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub login: usize,
    pub current_user: usize,
    pub register_user: usize,
    pub recover_password: usize,
    pub reset_password: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.login
            + self.current_user
            + self.register_user
            + self.recover_password
            + self.reset_password
    }
}

impl MockBackendClient {
    /// Create a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the profile returned from current_user and register_user.
    pub async fn with_user(self, user: UserProfile) -> Self {
        *self.user.lock().await = Some(user);
        self
    }

    /// Configure the token returned from login.
    pub async fn with_token(self, token: &str) -> Self {
        *self.token.lock().await = Some(AccessToken::bearer(token));
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Make every current_user call fail with `error`.
    pub async fn with_user_error(self, error: ApiError) -> Self {
        *self.user_error.lock().await = Some(error);
        self
    }

    /// Hold current_user calls until `gate` is notified.
    pub async fn with_current_user_gate(self, gate: Arc<Notify>) -> Self {
        *self.current_user_gate.lock().await = Some(gate);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Tokens presented to current_user, in call order.
    pub async fn seen_tokens(&self) -> Vec<String> {
        self.seen_tokens.lock().await.clone()
    }

    /// Check if there's a pending error and consume it.
    async fn check_error(&self) -> ApiResult<()> {
        let mut error = self.error.lock().await;
        match error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn configured_user(&self, fallback_email: &str) -> UserProfile {
        self.user.lock().await.clone().unwrap_or_else(|| UserProfile {
            id: "mock-user".to_string(),
            email: fallback_email.to_string(),
            full_name: None,
            is_active: true,
            is_superuser: false,
        })
    }
}

#[async_trait]
impl AuthApi for MockBackendClient {
    async fn login(&self, _credentials: &Credentials) -> ApiResult<AccessToken> {
        self.call_count.lock().await.login += 1;
        self.check_error().await?;

        Ok(self
            .token
            .lock()
            .await
            .clone()
            .unwrap_or_else(|| AccessToken::bearer("mock-token")))
    }

    async fn current_user(&self, token: &Token) -> ApiResult<UserProfile> {
        self.call_count.lock().await.current_user += 1;
        self.seen_tokens.lock().await.push(token.as_str().to_string());

        let gate = self.current_user_gate.lock().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.check_error().await?;
        if let Some(err) = self.user_error.lock().await.clone() {
            return Err(err);
        }

        Ok(self.configured_user("mock@example.com").await)
    }

    async fn register_user(&self, registration: &Registration) -> ApiResult<UserProfile> {
        self.call_count.lock().await.register_user += 1;
        self.check_error().await?;

        Ok(self.configured_user(&registration.email).await)
    }

    async fn recover_password(&self, _email: &str) -> ApiResult<Message> {
        self.call_count.lock().await.recover_password += 1;
        self.check_error().await?;

        Ok(Message {
            message: "Password recovery email sent".to_string(),
        })
    }

    async fn reset_password(&self, _request: &NewPassword) -> ApiResult<Message> {
        self.call_count.lock().await.reset_password += 1;
        self.check_error().await?;

        Ok(Message {
            message: "Password updated successfully".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_defaults() {
        let mock = MockBackendClient::new();

        let token = mock.login(&Credentials::new("a@b.com", "x")).await.unwrap();
        assert_eq!(token.access_token.as_str(), "mock-token");

        let user = mock.current_user(&token.access_token).await.unwrap();
        assert_eq!(user.email, "mock@example.com");

        assert_eq!(mock.call_counts().await.total(), 2);
        assert_eq!(mock.seen_tokens().await, vec!["mock-token".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_one_shot_error() {
        let mock = MockBackendClient::new()
            .with_error(ApiError::Unauthorized)
            .await;

        assert!(mock.current_user(&Token::new("t")).await.is_err());
        assert!(mock.current_user(&Token::new("t")).await.is_ok());
        assert_eq!(mock.call_counts().await.current_user, 2);
    }

    #[tokio::test]
    async fn test_mock_sticky_user_error() {
        let mock = MockBackendClient::new()
            .with_user_error(ApiError::Forbidden)
            .await;

        for _ in 0..3 {
            assert!(matches!(
                mock.current_user(&Token::new("t")).await,
                Err(ApiError::Forbidden)
            ));
        }
        assert!(mock.login(&Credentials::new("a@b.com", "x")).await.is_ok());
    }
}
