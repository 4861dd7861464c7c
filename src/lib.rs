// ABOUTME: Library root for berth - container lifecycle over interchangeable backends.
// ABOUTME: The berth binary is in main.rs.

pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod output;
pub mod types;

pub use lifecycle::{BackendKind, ContainerLifecycle, LifecycleError, Operation};

use cluster::KubernetesAdapter;
use config::Settings;
use engine::DockerAdapter;

/// Build the adapter selected by `settings.backend`. No connection is made
/// until the first operation.
pub fn adapter_for(settings: &Settings) -> Box<dyn ContainerLifecycle> {
    match settings.backend {
        BackendKind::Docker => Box::new(DockerAdapter::from_settings(settings.docker.clone())),
        BackendKind::Kubernetes => {
            Box::new(KubernetesAdapter::from_settings(settings.kubernetes.clone()))
        }
    }
}
