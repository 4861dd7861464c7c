// ABOUTME: Collaborator trait for a pod-based cluster control plane.
// ABOUTME: Pod manifests, pod summaries and structured cluster errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors reported by a cluster client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClusterError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("cluster API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("cluster connection error: {0}")]
    Connection(String),

    #[error("unexpected cluster response: {0}")]
    Decode(String),
}

impl ClusterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClusterError::NotFound(_))
    }

    /// Whether the control plane answered with an error status.
    pub fn is_api(&self) -> bool {
        matches!(self, ClusterError::NotFound(_) | ClusterError::Api { .. })
    }
}

/// Minimal single-container pod manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodManifest {
    pub api_version: String,
    pub kind: String,
    pub metadata: PodMetadata,
    pub spec: PodSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodMetadata {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodSpec {
    pub containers: Vec<PodContainer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodContainer {
    pub name: String,
    pub image: String,
}

impl PodManifest {
    /// One container named after the pod, running `image`.
    pub fn single(name: &str, image: &str) -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: "Pod".to_string(),
            metadata: PodMetadata {
                name: name.to_string(),
            },
            spec: PodSpec {
                containers: vec![PodContainer {
                    name: name.to_string(),
                    image: image.to_string(),
                }],
            },
        }
    }
}

/// Identity of a pod as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PodSummary {
    pub uid: String,
    pub name: String,
}

/// A client bound to one control-plane endpoint.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodSummary>, ClusterError>;

    /// Submit a pod, returning the created pod's identity.
    async fn create_pod(
        &self,
        namespace: &str,
        manifest: &PodManifest,
    ) -> Result<PodSummary, ClusterError>;

    async fn read_pod_log(&self, namespace: &str, name: &str) -> Result<String, ClusterError>;

    /// Connect/exec into a pod, returning the raw response payload.
    async fn exec_pod(
        &self,
        namespace: &str,
        name: &str,
        command: &[String],
    ) -> Result<String, ClusterError>;

    /// Payload of the most recent response, if any.
    ///
    /// Diagnostic only: shared by every caller of this client, so it may
    /// belong to another request when calls run concurrently.
    fn last_response(&self) -> Option<String>;
}

/// Constructs cluster clients.
#[async_trait]
pub trait ClusterConnector: Send + Sync {
    type Client: ClusterClient;

    async fn connect(&self) -> Result<Self::Client, ClusterError>;
}
