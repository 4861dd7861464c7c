// ABOUTME: Collaborator trait for a connected single-host engine client.
// ABOUTME: Engine calls take native ids; errors carry a structured kind.

use super::create::CreateConfig;
use crate::types::ApiVersion;
use async_trait::async_trait;
use std::fmt;

/// Errors reported by an engine client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("engine API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Error reported inside a progress stream, e.g. a failed pull.
    #[error("engine stream error: {0}")]
    Stream(String),

    #[error("engine connection error: {0}")]
    Connection(String),
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::NotFound(_))
    }

    /// Whether the engine answered with an error response, as opposed to the
    /// request never completing.
    pub fn is_api(&self) -> bool {
        matches!(
            self,
            EngineError::NotFound(_) | EngineError::Api { .. } | EngineError::Stream(_)
        )
    }
}

/// State-changing actions that take only a native id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerAction {
    Start,
    Stop,
    Restart,
    Pause,
    Unpause,
}

impl fmt::Display for ContainerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerAction::Start => "start",
            ContainerAction::Stop => "stop",
            ContainerAction::Restart => "restart",
            ContainerAction::Pause => "pause",
            ContainerAction::Unpause => "unpause",
        };
        f.write_str(name)
    }
}

/// Fully inspected instance as returned by [`EngineClient::list_instances`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDetail {
    /// Native container id.
    pub id: String,
    /// Configured name, without the leading `/` the engine reports.
    pub name: String,
}

/// Exec session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecSpec {
    pub cmd: Vec<String>,
    pub attach_stdin: bool,
    pub attach_stdout: bool,
    pub attach_stderr: bool,
    pub tty: bool,
}

impl ExecSpec {
    /// Output-capturing session: stdout and stderr attached, no stdin, no TTY.
    pub fn capture(cmd: Vec<String>) -> Self {
        Self {
            cmd,
            attach_stdin: false,
            attach_stdout: true,
            attach_stderr: true,
            tty: false,
        }
    }
}

/// A connected single-host engine.
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// API version the engine reports for itself.
    async fn api_version(&self) -> Result<ApiVersion, EngineError>;

    /// Whether the client can drive two-step exec sessions.
    fn supports_exec_sessions(&self) -> bool;

    /// Every instance including stopped ones, with inspection detail.
    async fn list_instances(&self) -> Result<Vec<InstanceDetail>, EngineError>;

    async fn pull_image(&self, repository: &str, tag: Option<&str>) -> Result<(), EngineError>;

    async fn inspect_image(&self, image: &str) -> Result<(), EngineError>;

    /// Create an instance, returning its native id.
    async fn create_container(&self, config: &CreateConfig) -> Result<String, EngineError>;

    async fn container_action(&self, id: &str, action: ContainerAction)
    -> Result<(), EngineError>;

    async fn remove_container(&self, id: &str) -> Result<(), EngineError>;

    /// Raw `State` document of an instance.
    async fn inspect_state(&self, id: &str) -> Result<serde_json::Value, EngineError>;

    /// Combined stdout and stderr collected so far.
    async fn logs(&self, id: &str) -> Result<String, EngineError>;

    /// Create an exec session, returning its id.
    async fn exec_create(&self, id: &str, spec: &ExecSpec) -> Result<String, EngineError>;

    /// Start an exec session and block until its output is captured.
    async fn exec_start(&self, exec_id: &str) -> Result<String, EngineError>;

    /// Single-call execute primitive for clients without exec sessions.
    async fn execute(&self, id: &str, cmd: &[String]) -> Result<String, EngineError>;
}

/// Establishes engine connections.
#[async_trait]
pub trait EngineConnector: Send + Sync {
    type Client: EngineClient;

    async fn connect(&self) -> Result<Self::Client, EngineError>;
}
