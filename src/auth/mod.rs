//! Auth actions: login, signup, logout and password recovery
//!
//! Inputs are checked locally before any request is made. Every outcome that
//! the backend classifies as a rejection signs the session out, whichever
//! call produced it.

use std::sync::Arc;

use serde::Serialize;

use crate::client::AuthApi;
use crate::client::models::{Credentials, Message, NewPassword, Registration, UserProfile};
use crate::config::SignupPolicy;
use crate::error::AuthError;
use crate::route::{Route, Router};
use crate::session::Session;

/// Minimum password length accepted by the backend for new passwords
pub const MIN_PASSWORD_LEN: usize = 8;

/// Result of a successful signup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "user", rename_all = "snake_case")]
pub enum SignupOutcome {
    /// Account created and signed in
    SignedIn(UserProfile),
    /// Account created; the user was sent to the login screen
    AwaitingLogin(UserProfile),
}

pub struct AuthActions {
    api: Arc<dyn AuthApi>,
    session: Arc<Session>,
    router: Arc<dyn Router>,
    signup_policy: SignupPolicy,
}

impl AuthActions {
    pub fn new(
        api: Arc<dyn AuthApi>,
        session: Arc<Session>,
        router: Arc<dyn Router>,
        signup_policy: SignupPolicy,
    ) -> Self {
        Self {
            api,
            session,
            router,
            signup_policy,
        }
    }

    /// Exchange credentials for a token, load the profile it belongs to, and
    /// publish the authenticated session. Navigates to the home route.
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile, AuthError> {
        validate_email(&credentials.email)?;
        if credentials.password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }

        let user = self.sign_in(credentials).await.map_err(|e| self.settle_error(e))?;
        log::info!("Signed in as {}", user.email);
        self.router.navigate(Route::HOME);
        Ok(user)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<UserProfile, AuthError> {
        let access = self.api.login(credentials).await?;
        log::debug!("Received {} token", access.token_type);
        // The new token is trusted; this fetch only loads the profile
        let user = self.api.current_user(&access.access_token).await?;
        self.session.sign_in(&access.access_token, user.clone())?;
        Ok(user)
    }

    /// Register an account, then follow the configured signup policy
    pub async fn signup(&self, registration: &Registration) -> Result<SignupOutcome, AuthError> {
        validate_email(&registration.email)?;
        validate_new_password(&registration.password)?;

        let user = self
            .api
            .register_user(registration)
            .await
            .map_err(|e| self.settle_error(e.into()))?;
        log::info!("Registered {}", user.email);

        match self.signup_policy {
            SignupPolicy::RedirectToLogin => {
                self.router.navigate(Route::LOGIN);
                Ok(SignupOutcome::AwaitingLogin(user))
            }
            SignupPolicy::AutoLogin => {
                let user = self.login(&registration.credentials()).await?;
                Ok(SignupOutcome::SignedIn(user))
            }
        }
    }

    /// Sign out locally and go to the login screen. Never touches the network.
    pub fn logout(&self) {
        self.session.sign_out();
        self.router.navigate(Route::LOGIN);
        log::info!("Signed out");
    }

    /// Ask the backend to mail a password reset link
    pub async fn recover_password(&self, email: &str) -> Result<Message, AuthError> {
        validate_email(email)?;
        self.api
            .recover_password(email.trim())
            .await
            .map_err(|e| self.settle_error(e.into()))
    }

    /// Set a new password using a mailed reset token. Navigates to the login screen.
    pub async fn reset_password(&self, request: &NewPassword) -> Result<Message, AuthError> {
        if request.token.trim().is_empty() {
            return Err(AuthError::Validation("Reset token is required".to_string()));
        }
        validate_new_password(&request.new_password)?;

        let message = self
            .api
            .reset_password(request)
            .await
            .map_err(|e| self.settle_error(e.into()))?;
        self.router.navigate(Route::LOGIN);
        Ok(message)
    }

    fn settle_error(&self, err: AuthError) -> AuthError {
        if err.is_rejected() {
            log::warn!("Backend rejected the session, signing out");
            self.session.sign_out();
        }
        err
    }
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AuthError::Validation("Email is required".to_string()));
    }
    if !email.contains('@') {
        return Err(AuthError::Validation(format!("Invalid email address: {}", email)));
    }
    Ok(())
}

fn validate_new_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
