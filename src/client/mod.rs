//! Backend API client
//!
//! The session gate only sees the [`AuthApi`] trait. [`BackendClient`] talks
//! to the FastAPI backend over HTTP; the mock stands in for it in tests.

pub mod api;
pub mod backend;
#[cfg(test)]
pub mod mock;
pub mod models;

pub use api::AuthApi;
pub use backend::BackendClient;
#[cfg(test)]
pub use mock::MockBackendClient;
