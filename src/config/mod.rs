// ABOUTME: Configuration types and loading for berth.yml.
// ABOUTME: Handles YAML parsing, file discovery and environment overrides.

mod cluster;
mod engine;

pub use cluster::{ClusterSettings, DEFAULT_CLUSTER_ENDPOINT, DEFAULT_NAMESPACE};
pub use engine::{DEFAULT_ENGINE_URL, EngineSettings, TlsConfig};

use crate::error::{Error, Result};
use crate::lifecycle::BackendKind;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "berth.yml";
pub const CONFIG_FILENAME_ALT: &str = "berth.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".berth/config.yml";

/// Overrides the engine URL.
pub const ENV_ENGINE_URL: &str = "DOCKER_HOST";
/// Overrides the cluster control-plane endpoint.
pub const ENV_CLUSTER_ENDPOINT: &str = "BERTH_CLUSTER_ENDPOINT";
/// Overrides the cluster namespace.
pub const ENV_NAMESPACE: &str = "BERTH_NAMESPACE";
/// Overrides the selected backend.
pub const ENV_BACKEND: &str = "BERTH_BACKEND";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default)]
    pub docker: EngineSettings,

    #[serde(default)]
    pub kubernetes: ClusterSettings,
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, or defaults when none exists.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Ok(Settings::default())
    }

    /// Load from an explicit path (which must exist) or by discovery in `dir`,
    /// then apply environment overrides and validate.
    pub fn resolve(dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let settings = match explicit {
            Some(path) if !path.exists() => {
                return Err(Error::ConfigNotFound(path.to_path_buf()));
            }
            Some(path) => Self::load(path)?,
            None => Self::discover(dir)?,
        };

        let settings = settings.with_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(url) = non_empty_var(ENV_ENGINE_URL) {
            self.docker.url = url;
        }
        if let Some(endpoint) = non_empty_var(ENV_CLUSTER_ENDPOINT) {
            self.kubernetes.endpoint = endpoint;
        }
        if let Some(namespace) = non_empty_var(ENV_NAMESPACE) {
            self.kubernetes.namespace = namespace;
        }
        if let Some(backend) = non_empty_var(ENV_BACKEND) {
            self.backend = parse_backend(&backend)?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        match self.docker.scheme() {
            Some("unix" | "tcp" | "http" | "https") => {}
            _ => {
                return Err(Error::InvalidConfig(format!(
                    "docker.url must use unix://, tcp://, http:// or https://, got '{}'",
                    self.docker.url
                )));
            }
        }

        if self.docker.scheme() == Some("https") && self.docker.tls.is_none() {
            return Err(Error::InvalidConfig(format!(
                "docker.url '{}' uses https:// but no docker.tls is configured",
                self.docker.url
            )));
        }

        if let Some(ref version) = self.docker.api_version {
            crate::types::ApiVersion::parse(version)
                .map_err(|e| Error::InvalidConfig(format!("docker.api_version: {}", e)))?;
        }

        let endpoint = url::Url::parse(&self.kubernetes.endpoint).map_err(|e| {
            Error::InvalidConfig(format!(
                "kubernetes.endpoint '{}': {}",
                self.kubernetes.endpoint, e
            ))
        })?;
        if endpoint.scheme() != "http" {
            return Err(Error::InvalidConfig(format!(
                "kubernetes.endpoint must use http://, got '{}'",
                self.kubernetes.endpoint
            )));
        }

        if self.kubernetes.namespace.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "kubernetes.namespace cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_backend(value: &str) -> Result<BackendKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "docker" => Ok(BackendKind::Docker),
        "kubernetes" | "k8s" => Ok(BackendKind::Kubernetes),
        other => Err(Error::InvalidConfig(format!("unknown backend '{}'", other))),
    }
}
