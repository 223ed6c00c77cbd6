//! Backend data models
//!
//! Request and response shapes for the authentication endpoints of the
//! FastAPI backend.

mod auth;
mod user;

pub use auth::{AccessToken, Credentials, Message, NewPassword, Registration};
pub use user::UserProfile;
