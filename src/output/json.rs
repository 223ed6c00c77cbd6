//! JSON output envelope

use chrono::Utc;
use serde::Serialize;

/// `{ "data": ..., "meta": ... }` wrapper for every JSON result
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a, T: ?Sized> {
    pub data: &'a T,
    pub meta: Metadata,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    /// Subcommand that produced the output
    pub command: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
    /// CLI version
    pub version: String,
}

impl<'a, T: ?Sized> JsonOutput<'a, T> {
    pub fn new(command: &str, data: &'a T) -> Self {
        Self {
            data,
            meta: Metadata {
                command: command.to_string(),
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

/// Format data as pretty-printed JSON inside the envelope
pub fn format_json<T: Serialize + ?Sized>(
    command: &str,
    data: &T,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(command, data))
}
