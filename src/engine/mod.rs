// ABOUTME: Single-host engine backend: adapter, client seam and bollard client.
// ABOUTME: Logical names are resolved against configured instance names.

mod adapter;
mod capabilities;
mod client;
mod create;
mod docker;

pub use adapter::{Connection, EngineAdapter};
pub use capabilities::{EngineCapabilities, NESTED_MEMORY_LIMIT_SINCE};
pub use client::{
    ContainerAction, EngineClient, EngineConnector, EngineError, ExecSpec, InstanceDetail,
};
pub use create::{CreateConfig, HostConfigSpec, build_create_config};
pub use docker::{BollardConnector, BollardEngine};

use crate::config::EngineSettings;

/// Engine adapter that connects with bollard on first use.
pub type DockerAdapter = EngineAdapter<BollardConnector>;

impl DockerAdapter {
    pub fn from_settings(settings: EngineSettings) -> Self {
        EngineAdapter::new(BollardConnector::new(settings))
    }
}
