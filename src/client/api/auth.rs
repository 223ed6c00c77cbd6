//! Authentication API trait

use async_trait::async_trait;

use crate::client::models::{AccessToken, Credentials, Message, NewPassword, Registration, UserProfile};
use crate::error::ApiResult;
use crate::store::Token;

/// Authentication operations of the backend.
///
/// Every method either resolves with data or fails with an [`ApiError`](crate::error::ApiError)
/// carrying the HTTP classification of the failure.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a bearer token
    async fn login(&self, credentials: &Credentials) -> ApiResult<AccessToken>;

    /// Fetch the profile the token belongs to
    async fn current_user(&self, token: &Token) -> ApiResult<UserProfile>;

    /// Create a new account
    async fn register_user(&self, registration: &Registration) -> ApiResult<UserProfile>;

    /// Ask the backend to mail a password reset link
    async fn recover_password(&self, email: &str) -> ApiResult<Message>;

    /// Set a new password using a reset token
    async fn reset_password(&self, request: &NewPassword) -> ApiResult<Message>;
}
