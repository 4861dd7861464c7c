// ABOUTME: Lifecycle adapter for a single-host container engine.
// ABOUTME: Resolves logical names by scanning every instance on each call.

use super::capabilities::EngineCapabilities;
use super::client::{ContainerAction, EngineClient, EngineConnector, EngineError, ExecSpec};
use super::create::build_create_config;
use crate::lifecycle::sealed::Sealed;
use crate::lifecycle::{
    BackendKind, ContainerLifecycle, Operation, Result, guard, invalid_argument, parse_command,
};
use crate::types::{
    CommandOutput, ContainerRecord, CreateOutcome, CreateParams, ImageRef, StatusDescriptor,
};
use async_trait::async_trait;
use tokio::sync::OnceCell;

type EngineResult<T> = std::result::Result<T, EngineError>;

const BACKEND: BackendKind = BackendKind::Docker;

/// An established engine connection and what it supports.
pub struct Connection<C> {
    client: C,
    capabilities: EngineCapabilities,
}

impl<C: EngineClient> Connection<C> {
    pub fn capabilities(&self) -> &EngineCapabilities {
        &self.capabilities
    }
}

/// Single-host lifecycle adapter.
///
/// The engine connection is opened on first use (or by [`EngineAdapter::connect`])
/// and kept for the adapter's lifetime. It is never re-established; recreate
/// the adapter after the engine goes away. A failed attempt leaves nothing
/// cached, so the next call tries again.
pub struct EngineAdapter<F: EngineConnector> {
    connector: F,
    connection: OnceCell<Connection<F::Client>>,
}

impl<F: EngineConnector> EngineAdapter<F> {
    pub fn new(connector: F) -> Self {
        Self {
            connector,
            connection: OnceCell::new(),
        }
    }

    /// Open the engine connection now instead of on the first operation.
    pub async fn connect(&self) -> Result<&Connection<F::Client>> {
        guard(BACKEND, Operation::List, None, self.connection()).await
    }

    /// Whether a connection has been established.
    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    async fn connection(&self) -> EngineResult<&Connection<F::Client>> {
        self.connection
            .get_or_try_init(|| async {
                let client = self.connector.connect().await?;
                let api_version = client.api_version().await?;
                let capabilities =
                    EngineCapabilities::resolve(api_version, client.supports_exec_sessions());
                tracing::debug!(
                    api_version = %capabilities.api_version,
                    nested_memory_limit = capabilities.nested_memory_limit,
                    exec_sessions = capabilities.exec_sessions,
                    "connected to engine"
                );
                Ok::<_, EngineError>(Connection {
                    client,
                    capabilities,
                })
            })
            .await
    }

    /// Find the instance whose configured name is `name`.
    ///
    /// Scans every instance; the first match wins.
    async fn resolve(&self, client: &F::Client, name: &str) -> EngineResult<Option<ContainerRecord>> {
        let instances = match client.list_instances().await {
            Ok(instances) => instances,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(instances
            .into_iter()
            .find(|info| info.name == name)
            .map(|info| ContainerRecord::new(info.id, info.name)))
    }

    async fn list_records(&self) -> EngineResult<Vec<ContainerRecord>> {
        let conn = self.connection().await?;
        let instances = conn.client.list_instances().await?;
        Ok(instances
            .into_iter()
            .map(|info| ContainerRecord::new(info.id, info.name))
            .collect())
    }

    async fn create_instance(
        &self,
        params: &CreateParams,
        image: &ImageRef,
        cmd: Option<Vec<String>>,
    ) -> EngineResult<CreateOutcome> {
        let conn = self.connection().await?;
        let config = build_create_config(params, cmd, &conn.capabilities);

        let attempt = async {
            conn.client
                .pull_image(image.repository(), image.tag())
                .await?;
            conn.client.inspect_image(&config.image).await?;
            conn.client.create_container(&config).await
        };

        match attempt.await {
            Ok(id) => Ok(CreateOutcome::Created { id }),
            Err(e) if e.is_api() => {
                tracing::warn!(
                    container = %params.name,
                    image = %params.image,
                    error = %e,
                    "engine rejected container creation"
                );
                Ok(CreateOutcome::Failed {
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn act(&self, action: ContainerAction, name: &str) -> EngineResult<Option<ContainerRecord>> {
        let conn = self.connection().await?;
        let Some(record) = self.resolve(&conn.client, name).await? else {
            tracing::debug!(container = name, %action, "no such container");
            return Ok(None);
        };
        conn.client.container_action(record.id(), action).await?;
        Ok(Some(record))
    }

    async fn remove(&self, name: &str) -> EngineResult<Option<ContainerRecord>> {
        let conn = self.connection().await?;
        let Some(record) = self.resolve(&conn.client, name).await? else {
            return Ok(None);
        };
        conn.client.remove_container(record.id()).await?;
        Ok(Some(record))
    }

    async fn state(&self, name: &str) -> EngineResult<Option<StatusDescriptor>> {
        let conn = self.connection().await?;
        let Some(record) = self.resolve(&conn.client, name).await? else {
            tracing::warn!(container = name, "cannot find engine instance");
            return Ok(None);
        };
        match conn.client.inspect_state(record.id()).await {
            Ok(state) => Ok(Some(StatusDescriptor::new(state))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn fetch_logs(&self, name: &str) -> EngineResult<Option<CommandOutput>> {
        let conn = self.connection().await?;
        let Some(record) = self.resolve(&conn.client, name).await? else {
            return Ok(None);
        };
        let output = conn.client.logs(record.id()).await?;
        Ok(Some(CommandOutput::new(output)))
    }

    async fn run_command(&self, name: &str, cmd: Vec<String>) -> EngineResult<Option<CommandOutput>> {
        let conn = self.connection().await?;
        let Some(record) = self.resolve(&conn.client, name).await? else {
            return Ok(None);
        };

        let output = if conn.capabilities.exec_sessions {
            let exec_id = conn
                .client
                .exec_create(record.id(), &ExecSpec::capture(cmd))
                .await?;
            conn.client.exec_start(&exec_id).await?
        } else {
            conn.client.execute(record.id(), &cmd).await?
        };

        Ok(Some(CommandOutput::new(output)))
    }

    async fn run_action(
        &self,
        operation: Operation,
        action: ContainerAction,
        name: &str,
    ) -> Result<Option<ContainerRecord>> {
        tracing::debug!(container = name, %action, "container action");
        guard(BACKEND, operation, Some(name), self.act(action, name)).await
    }
}

impl<F: EngineConnector> Sealed for EngineAdapter<F> {}

#[async_trait]
impl<F: EngineConnector> ContainerLifecycle for EngineAdapter<F> {
    fn backend(&self) -> BackendKind {
        BACKEND
    }

    fn supports(&self, _operation: Operation) -> bool {
        true
    }

    async fn list(&self) -> Result<Vec<ContainerRecord>> {
        guard(BACKEND, Operation::List, None, self.list_records()).await
    }

    async fn create(&self, params: &CreateParams) -> Result<CreateOutcome> {
        tracing::debug!(container = %params.name, image = %params.image, "creating container");
        let image =
            ImageRef::parse(&params.image).map_err(|e| invalid_argument(Operation::Create, e))?;
        let cmd = params
            .command
            .as_deref()
            .map(|c| parse_command(Operation::Create, c))
            .transpose()?
            .map(Vec::from);

        guard(
            BACKEND,
            Operation::Create,
            Some(params.name.as_str()),
            self.create_instance(params, &image, cmd),
        )
        .await
    }

    async fn start(&self, id: &str) -> Result<Option<ContainerRecord>> {
        self.run_action(Operation::Start, ContainerAction::Start, id)
            .await
    }

    async fn stop(&self, id: &str) -> Result<Option<ContainerRecord>> {
        self.run_action(Operation::Stop, ContainerAction::Stop, id)
            .await
    }

    async fn restart(&self, id: &str) -> Result<Option<ContainerRecord>> {
        self.run_action(Operation::Restart, ContainerAction::Restart, id)
            .await
    }

    async fn pause(&self, id: &str) -> Result<Option<ContainerRecord>> {
        self.run_action(Operation::Pause, ContainerAction::Pause, id)
            .await
    }

    async fn unpause(&self, id: &str) -> Result<Option<ContainerRecord>> {
        self.run_action(Operation::Unpause, ContainerAction::Unpause, id)
            .await
    }

    async fn delete(&self, id: &str) -> Result<Option<ContainerRecord>> {
        tracing::debug!(container = id, "deleting container");
        guard(BACKEND, Operation::Delete, Some(id), self.remove(id)).await
    }

    async fn inspect(&self, id: &str) -> Result<Option<StatusDescriptor>> {
        tracing::debug!(container = id, "inspecting container");
        guard(BACKEND, Operation::Inspect, Some(id), self.state(id)).await
    }

    async fn logs(&self, id: &str) -> Result<Option<CommandOutput>> {
        tracing::debug!(container = id, "fetching logs");
        guard(BACKEND, Operation::Logs, Some(id), self.fetch_logs(id)).await
    }

    async fn execute(&self, id: &str, command: &str) -> Result<Option<CommandOutput>> {
        tracing::debug!(container = id, command, "executing command");
        let cmd: Vec<String> = parse_command(Operation::Execute, command)?.into();
        guard(BACKEND, Operation::Execute, Some(id), self.run_command(id, cmd)).await
    }
}
