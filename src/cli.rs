// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use berth::BackendKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "berth")]
#[command(about = "Manage containers on Docker or Kubernetes through one interface")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to berth.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend to use, overriding the configuration
    #[arg(short, long, global = true, value_enum)]
    pub backend: Option<Backend>,

    /// Output JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Backend {
    Docker,
    Kubernetes,
}

impl From<Backend> for BackendKind {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Docker => BackendKind::Docker,
            Backend::Kubernetes => BackendKind::Kubernetes,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all containers known to the backend
    List,

    /// Create a container (does not wait for it to run)
    Create {
        /// Logical name of the container
        name: String,

        /// Image reference, e.g. ubuntu:14.04
        image: String,

        /// Command to run, split with shell quoting rules
        #[arg(long)]
        command: Option<String>,

        /// Environment variable (repeatable)
        #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_env)]
        env: Vec<(String, String)>,

        /// Memory limit in bytes
        #[arg(long)]
        memory: Option<i64>,

        /// Container hostname
        #[arg(long)]
        hostname: Option<String>,
    },

    /// Start a container
    Start { name: String },

    /// Stop a container
    Stop { name: String },

    /// Restart a container
    Restart { name: String },

    /// Pause a container
    Pause { name: String },

    /// Unpause a container
    Unpause { name: String },

    /// Delete a container
    Delete { name: String },

    /// Show the backend's raw state for a container
    Inspect { name: String },

    /// Print a container's logs
    Logs { name: String },

    /// Run a command inside a container
    Exec {
        name: String,

        /// Command line, split with shell quoting rules
        command: String,
    },
}

fn parse_env(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", input)),
    }
}
