//! User profile model

use serde::{Deserialize, Serialize};

/// Current user as returned by `GET /users/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID (UUID on the FastAPI backend)
    pub id: String,

    /// User email address
    pub email: String,

    /// Display name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub is_superuser: bool,
}

fn default_true() -> bool {
    true
}

impl UserProfile {
    /// Minimal active, non-superuser profile
    #[cfg(test)]
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            full_name: None,
            is_active: true,
            is_superuser: false,
        }
    }

    /// Name to show in the UI: full name, else email
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}
