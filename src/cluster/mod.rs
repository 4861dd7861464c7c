// ABOUTME: Cluster backend: pod adapter, client seam and HTTP pod API client.
// ABOUTME: Logical names are passed through as pod names.

mod adapter;
mod api;
mod client;

pub use adapter::ClusterAdapter;
pub use api::{HttpClusterClient, HttpClusterConnector};
pub use client::{
    ClusterClient, ClusterConnector, ClusterError, PodContainer, PodManifest, PodMetadata,
    PodSpec, PodSummary,
};

use crate::config::ClusterSettings;

/// Cluster adapter speaking the core/v1 pod API over HTTP.
pub type KubernetesAdapter = ClusterAdapter<HttpClusterConnector>;

impl KubernetesAdapter {
    pub fn from_settings(settings: ClusterSettings) -> Self {
        let namespace = settings.namespace.clone();
        ClusterAdapter::new(HttpClusterConnector::new(settings), namespace)
    }
}
