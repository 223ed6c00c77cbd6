//! API trait definitions
//!
//! The backend surface the session gate consumes is a single trait,
//! [`AuthApi`], implemented by the HTTP client and by the test mock.

mod auth;

pub use auth::AuthApi;
