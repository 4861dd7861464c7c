// ABOUTME: Backend kinds and lifecycle operation names.
// ABOUTME: Used for backend selection, capability queries and error tagging.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of backend an adapter drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Single-host container engine (Docker Engine API).
    #[default]
    Docker,
    /// Pod-based cluster control plane (Kubernetes core/v1).
    Kubernetes,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Docker => write!(f, "docker"),
            BackendKind::Kubernetes => write!(f, "kubernetes"),
        }
    }
}

/// One operation of the lifecycle interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Start,
    Stop,
    Restart,
    Pause,
    Unpause,
    Delete,
    Inspect,
    Logs,
    Execute,
}

impl Operation {
    pub const ALL: [Operation; 11] = [
        Operation::List,
        Operation::Create,
        Operation::Start,
        Operation::Stop,
        Operation::Restart,
        Operation::Pause,
        Operation::Unpause,
        Operation::Delete,
        Operation::Inspect,
        Operation::Logs,
        Operation::Execute,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Start => "start",
            Operation::Stop => "stop",
            Operation::Restart => "restart",
            Operation::Pause => "pause",
            Operation::Unpause => "unpause",
            Operation::Delete => "delete",
            Operation::Inspect => "inspect",
            Operation::Logs => "logs",
            Operation::Execute => "execute",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
