use std::time::Duration;

use duration_str::deserialize_option_duration;
use serde::Deserialize;

/// Location and credential of the document-storage backend.
#[derive(Deserialize)]
pub struct BackendConfig {
    host: String,
    port: u16,
    admin_key: String,
    /// Absent means outbound calls may wait forever.
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    timeout: Option<Duration>,
}

impl BackendConfig {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> &u16 {
        &self.port
    }

    pub fn admin_key(&self) -> &str {
        &self.admin_key
    }

    pub fn timeout(&self) -> &Option<Duration> {
        &self.timeout
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
