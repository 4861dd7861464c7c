// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal and JSON output modes.

use crate::types::{CommandOutput, ContainerRecord, CreateOutcome, StatusDescriptor};
use serde::Serialize;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly text
    Normal,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    /// Print one line per record.
    pub fn records(&self, records: &[ContainerRecord]) {
        for record in records {
            self.record(record);
        }
    }

    pub fn record(&self, record: &ContainerRecord) {
        match self.mode {
            OutputMode::Normal => println!("{}\t{}", record.id(), record.name()),
            OutputMode::Json => emit(&record),
        }
    }

    /// Print a record acted on by `operation`.
    pub fn acted(&self, operation: &str, record: &ContainerRecord) {
        match self.mode {
            OutputMode::Normal => println!("{}: {} ({})", operation, record.name(), record.id()),
            OutputMode::Json => emit(&JsonEvent {
                event: operation,
                message: record.name(),
                id: Some(record.id()),
            }),
        }
    }

    pub fn created(&self, name: &str, outcome: &CreateOutcome) {
        match self.mode {
            OutputMode::Normal => match outcome {
                CreateOutcome::Created { id } => println!("created: {} ({})", name, id),
                CreateOutcome::Failed { reason } => println!("create failed: {}: {}", name, reason),
            },
            OutputMode::Json => emit(outcome),
        }
    }

    pub fn status(&self, status: &StatusDescriptor) {
        match self.mode {
            OutputMode::Normal => match serde_json::to_string_pretty(status.as_value()) {
                Ok(text) => println!("{text}"),
                Err(_) => println!("{}", status.as_value()),
            },
            OutputMode::Json => emit(status),
        }
    }

    /// Print captured command or log output verbatim.
    pub fn command_output(&self, output: &CommandOutput) {
        match self.mode {
            OutputMode::Normal => print!("{}", output.output),
            OutputMode::Json => emit(output),
        }
    }

    /// Report that `operation` did nothing on this backend.
    pub fn skipped(&self, operation: &str, name: &str) {
        match self.mode {
            OutputMode::Normal => println!("{}: not supported by this backend ({})", operation, name),
            OutputMode::Json => emit(&JsonEvent {
                event: "unsupported",
                message: operation,
                id: Some(name),
            }),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("Error: {message}"),
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "error",
                    message,
                    id: None,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }
}

fn emit<T: Serialize + ?Sized>(value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        println!("{json}");
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
}
