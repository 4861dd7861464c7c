// ABOUTME: Value types exchanged through the lifecycle interface.
// ABOUTME: Container records, creation parameters, outcomes and command output.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Identity of one backend instance as reported by `list`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContainerRecord {
    id: String,
    name: String,
}

impl ContainerRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Backend-native identifier (engine container id or pod uid).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Logical name the instance was created with.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ContainerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Parameters for creating an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateParams {
    pub name: String,
    /// Image reference, `repository[:tag]`.
    pub image: String,
    /// Command line, split with shell-word rules.
    pub command: Option<String>,
    pub environment: Option<HashMap<String, String>>,
    /// Memory limit in bytes.
    pub memory_limit: Option<i64>,
    pub hostname: Option<String>,
}

impl CreateParams {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            ..Default::default()
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_memory_limit(mut self, bytes: i64) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Names of the optional settings that were supplied.
    pub fn option_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.command.is_some() {
            names.push("command");
        }
        if self.environment.is_some() {
            names.push("environment");
        }
        if self.memory_limit.is_some() {
            names.push("memory_limit");
        }
        if self.hostname.is_some() {
            names.push("hostname");
        }
        names
    }
}

/// Result of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum CreateOutcome {
    /// The backend accepted the request and assigned `id`.
    Created { id: String },
    /// The backend rejected the request; the instance does not exist.
    Failed { reason: String },
}

impl CreateOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, CreateOutcome::Created { .. })
    }
}

/// Raw backend state document returned by `inspect`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatusDescriptor(serde_json::Value);

impl StatusDescriptor {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Look up a top-level field of the descriptor.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}

/// Captured output of `logs` and `execute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    pub output: String,
}

impl CommandOutput {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}
