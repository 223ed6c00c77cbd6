//! Configuration management for sessiongate

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Backend used when neither the flag, the environment nor the config file names one
pub const DEFAULT_API_HOST: &str = "http://localhost:8000";

/// File name of the token store, placed next to the config file by default
const SESSION_FILE_NAME: &str = "session.yaml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL (scheme and host, without the `/api/v1` prefix)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// Token store location override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,

    /// What happens after a successful signup
    #[serde(default)]
    pub signup_policy: SignupPolicy,

    /// Session validation settings
    #[serde(default)]
    pub session: SessionSettings,
}

/// Post-signup behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupPolicy {
    /// Send the new user to the login screen to sign in explicitly
    #[default]
    RedirectToLogin,
    /// Sign in immediately with the registration credentials
    AutoLogin,
}

/// Session validation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Upper bound on the startup validation call
    #[serde(default = "default_validation_timeout_secs")]
    pub validation_timeout_secs: u64,

    /// Drop JWTs whose `exp` claim has passed before asking the server
    #[serde(default = "default_check_token_expiry")]
    pub check_token_expiry: bool,
}

fn default_validation_timeout_secs() -> u64 {
    10
}

fn default_check_token_expiry() -> bool {
    true
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            validation_timeout_secs: default_validation_timeout_secs(),
            check_token_expiry: default_check_token_expiry(),
        }
    }
}

impl SessionSettings {
    pub fn validation_timeout(&self) -> Duration {
        Duration::from_secs(self.validation_timeout_secs)
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".sessiongate").join("config.yaml"))
    }

    /// Resolve an optional override into a concrete config path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from a specific path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        if config.session.validation_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "session.validation_timeout_secs must be greater than zero".to_string(),
            )
            .into());
        }

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // Set file permissions to 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Backend base URL: explicit override, then config file, then the local default
    pub fn api_host(&self, host_override: Option<&str>) -> String {
        host_override
            .map(str::to_string)
            .or_else(|| self.api_host.clone())
            .unwrap_or_else(|| DEFAULT_API_HOST.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    /// Token store path: explicit `token_file`, else `session.yaml` beside the config file
    pub fn token_path(&self, config_path: &Path) -> PathBuf {
        match &self.token_file {
            Some(path) => path.clone(),
            None => config_path
                .parent()
                .map(|dir| dir.join(SESSION_FILE_NAME))
                .unwrap_or_else(|| PathBuf::from(SESSION_FILE_NAME)),
        }
    }
}
