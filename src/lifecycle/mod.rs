// ABOUTME: The container lifecycle interface shared by every backend adapter.
// ABOUTME: Defines ContainerLifecycle, operation names and the lifecycle error.

mod error;
mod operation;
pub(crate) mod sealed;

pub use error::{LifecycleError, LifecycleErrorKind, Result};
pub use operation::{BackendKind, Operation};

pub(crate) use error::{guard, invalid_argument};

use crate::types::{CommandOutput, ContainerRecord, CreateOutcome, CreateParams, StatusDescriptor};
use async_trait::async_trait;
use nonempty::NonEmpty;
use sealed::Sealed;

/// Container lifecycle operations over one backend.
///
/// Identifiers passed to the per-instance operations are logical names; each
/// adapter resolves them to backend handles on every call. `None` means the
/// name did not resolve to a live instance (or, for operations a backend does
/// not support, that nothing was done; see [`ContainerLifecycle::supports`]).
#[async_trait]
pub trait ContainerLifecycle: Sealed + Send + Sync {
    /// The backend this adapter drives.
    fn backend(&self) -> BackendKind;

    /// Whether `operation` performs a backend call on this adapter.
    fn supports(&self, operation: Operation) -> bool;

    /// List every instance the backend knows about. Order is unspecified.
    async fn list(&self) -> Result<Vec<ContainerRecord>>;

    /// Request creation of an instance. Does not wait for it to run.
    ///
    /// Backend rejections are reported as [`CreateOutcome::Failed`], not as
    /// errors; callers must check the outcome.
    async fn create(&self, params: &CreateParams) -> Result<CreateOutcome>;

    async fn start(&self, id: &str) -> Result<Option<ContainerRecord>>;

    async fn stop(&self, id: &str) -> Result<Option<ContainerRecord>>;

    async fn restart(&self, id: &str) -> Result<Option<ContainerRecord>>;

    async fn pause(&self, id: &str) -> Result<Option<ContainerRecord>>;

    async fn unpause(&self, id: &str) -> Result<Option<ContainerRecord>>;

    async fn delete(&self, id: &str) -> Result<Option<ContainerRecord>>;

    /// Raw backend state for the instance, or `None` if it does not exist.
    async fn inspect(&self, id: &str) -> Result<Option<StatusDescriptor>>;

    async fn logs(&self, id: &str) -> Result<Option<CommandOutput>>;

    /// Run `command` inside the instance and capture its output.
    async fn execute(&self, id: &str, command: &str) -> Result<Option<CommandOutput>>;
}

/// Split a command line into argv using shell-word rules.
pub(crate) fn parse_command(operation: Operation, command: &str) -> Result<NonEmpty<String>> {
    let words = shell_words::split(command).map_err(|e| invalid_argument(operation, e))?;
    NonEmpty::from_vec(words).ok_or_else(|| invalid_argument(operation, "command cannot be empty"))
}
