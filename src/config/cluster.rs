// ABOUTME: Connection settings for the cluster backend.
// ABOUTME: Control-plane endpoint and the namespace pods live in.

use serde::Deserialize;

pub const DEFAULT_CLUSTER_ENDPOINT: &str = "http://127.0.0.1:8080/";
pub const DEFAULT_NAMESPACE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClusterSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_endpoint() -> String {
    DEFAULT_CLUSTER_ENDPOINT.to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for ClusterSettings {
    fn default() -> Self {
        ClusterSettings {
            endpoint: default_endpoint(),
            namespace: default_namespace(),
        }
    }
}
