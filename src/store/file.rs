//! YAML file-backed token store
//!
//! The session file is a YAML map. The token sits under
//! [`TOKEN_KEY`](super::TOKEN_KEY); any other keys, nested or not, survive
//! a `set` or `clear`.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use super::{TOKEN_KEY, Token, TokenStore};
use crate::error::StoreError;

type Entries = BTreeMap<String, Value>;

/// Token store persisted to a YAML file
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    /// Open a store at `path` using the well-known token key
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: TOKEN_KEY.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, err: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }

    fn read_entries(&self) -> Result<Entries, StoreError> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        if contents.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_yaml::from_str(&contents).map_err(|e| StoreError::Encode(e.to_string()))
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let contents =
            serde_yaml::to_string(entries).map_err(|e| StoreError::Encode(e.to_string()))?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // The file holds a bearer credential: owner read/write only, from creation
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path).map_err(|e| self.io_error(e))?;

        // `mode` only applies on create; tighten files that predate the store
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            file.set_permissions(perms).map_err(|e| self.io_error(e))?;
        }

        file.write_all(contents.as_bytes()).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<Token> {
        match self.read_entries() {
            Ok(entries) => entries
                .get(&self.key)
                .and_then(Value::as_str)
                .filter(|value| !value.is_empty())
                .map(Token::new),
            Err(err) => {
                log::warn!("Treating unreadable session file as signed out: {}", err);
                None
            }
        }
    }

    fn set(&self, token: &Token) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking sign-in
        let mut entries = self.read_entries().unwrap_or_else(|err| {
            log::warn!("Overwriting unreadable session file: {}", err);
            Entries::new()
        });
        entries.insert(self.key.clone(), Value::String(token.as_str().to_string()));
        self.write_entries(&entries)?;
        log::debug!("Stored session token in {}", self.path.display());
        Ok(())
    }

    fn clear(&self) {
        let entries = match self.read_entries() {
            Ok(mut entries) => {
                if entries.remove(&self.key).is_none() {
                    return;
                }
                entries
            }
            Err(err) => {
                log::warn!("Resetting unreadable session file: {}", err);
                Entries::new()
            }
        };

        match self.write_entries(&entries) {
            Ok(()) => log::debug!("Cleared session token in {}", self.path.display()),
            Err(err) => log::error!("Failed to clear session token: {}", err),
        }
    }
}
