// ABOUTME: Connection settings for the single-host engine backend.
// ABOUTME: Endpoint URL, API version, timeout and optional mutual TLS material.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENGINE_URL: &str = "unix:///var/run/docker.sock";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_url")]
    pub url: String,

    /// Client API version; the client library default when absent.
    #[serde(default)]
    pub api_version: Option<String>,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

/// Mutual TLS material. All three files are required together.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TlsConfig {
    pub ca_cert: PathBuf,
    pub client_cert: PathBuf,
    pub client_key: PathBuf,
}

fn default_url() -> String {
    DEFAULT_ENGINE_URL.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            url: default_url(),
            api_version: None,
            timeout: default_timeout(),
            tls: None,
        }
    }
}

impl EngineSettings {
    /// Scheme of the configured URL, e.g. `unix` or `tcp`.
    pub fn scheme(&self) -> Option<&str> {
        self.url.split_once("://").map(|(scheme, _)| scheme)
    }
}
