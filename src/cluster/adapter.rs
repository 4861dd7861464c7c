// ABOUTME: Lifecycle adapter for a pod-based cluster control plane.
// ABOUTME: Logical names are pod names; per-pod state changes are not modelled.

use super::client::{ClusterClient, ClusterConnector, ClusterError, PodManifest};
use crate::lifecycle::sealed::Sealed;
use crate::lifecycle::{
    BackendKind, ContainerLifecycle, Operation, Result, guard, invalid_argument, parse_command,
};
use crate::types::{
    CommandOutput, ContainerRecord, CreateOutcome, CreateParams, ImageRef, StatusDescriptor,
};
use async_trait::async_trait;
use tokio::sync::OnceCell;

type ClusterResult<T> = std::result::Result<T, ClusterError>;

const BACKEND: BackendKind = BackendKind::Kubernetes;

const PAYLOAD_PREVIEW: usize = 200;

/// Operations that perform no cluster call.
const UNSUPPORTED: [Operation; 7] = [
    Operation::Start,
    Operation::Stop,
    Operation::Restart,
    Operation::Pause,
    Operation::Unpause,
    Operation::Delete,
    Operation::Inspect,
];

/// Cluster lifecycle adapter.
///
/// Pods are addressed directly by name within one namespace. Start, stop,
/// restart, pause, unpause, delete and inspect are accepted and ignored: they
/// return `None` for any name and [`ContainerLifecycle::supports`] reports
/// them as unsupported.
pub struct ClusterAdapter<C: ClusterConnector> {
    connector: C,
    namespace: String,
    client: OnceCell<C::Client>,
}

impl<C: ClusterConnector> ClusterAdapter<C> {
    pub fn new(connector: C, namespace: impl Into<String>) -> Self {
        Self {
            connector,
            namespace: namespace.into(),
            client: OnceCell::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Build the cluster client now instead of on the first operation.
    pub async fn connect(&self) -> Result<&C::Client> {
        guard(BACKEND, Operation::List, None, self.client()).await
    }

    pub fn is_connected(&self) -> bool {
        self.client.initialized()
    }

    async fn client(&self) -> ClusterResult<&C::Client> {
        self.client
            .get_or_try_init(|| async {
                let client = self.connector.connect().await?;
                tracing::debug!(namespace = %self.namespace, "connected to cluster");
                Ok::<_, ClusterError>(client)
            })
            .await
    }

    async fn list_pods(&self) -> ClusterResult<Vec<ContainerRecord>> {
        let client = self.client().await?;
        let pods = client
            .list_pods(&self.namespace)
            .await
            .map_err(|e| with_payload(client, e))?;
        Ok(pods
            .into_iter()
            .map(|pod| ContainerRecord::new(pod.uid, pod.name))
            .collect())
    }

    async fn submit_pod(&self, params: &CreateParams) -> ClusterResult<CreateOutcome> {
        let client = self.client().await?;
        let manifest = PodManifest::single(&params.name, &params.image);

        match client
            .create_pod(&self.namespace, &manifest)
            .await
            .map_err(|e| with_payload(client, e))
        {
            Ok(pod) => Ok(CreateOutcome::Created { id: pod.uid }),
            Err(e) if e.is_api() => {
                tracing::warn!(
                    pod = %params.name,
                    image = %params.image,
                    error = %e,
                    "cluster rejected pod creation"
                );
                Ok(CreateOutcome::Failed {
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn read_log(&self, name: &str) -> ClusterResult<Option<CommandOutput>> {
        let client = self.client().await?;
        match client.read_pod_log(&self.namespace, name).await {
            Ok(output) => {
                tracing::debug!(pod = name, payload = ?client.last_response(), "pod log response");
                Ok(Some(CommandOutput::new(output)))
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn exec(&self, name: &str, cmd: Vec<String>) -> ClusterResult<Option<CommandOutput>> {
        let client = self.client().await?;
        match client.exec_pod(&self.namespace, name, &cmd).await {
            Ok(output) => Ok(Some(CommandOutput::new(output))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn skip<T>(&self, operation: Operation, name: &str) -> Result<Option<T>> {
        tracing::debug!(pod = name, %operation, "operation not supported by cluster backend");
        Ok(None)
    }
}

/// Attach the undecodable payload to a decode failure.
fn with_payload<T: ClusterClient>(client: &T, err: ClusterError) -> ClusterError {
    match err {
        ClusterError::Decode(message) => match client.last_response() {
            Some(payload) => ClusterError::Decode(format!(
                "{} (response: {})",
                message,
                truncate(&payload, PAYLOAD_PREVIEW)
            )),
            None => ClusterError::Decode(message),
        },
        other => other,
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

impl<C: ClusterConnector> Sealed for ClusterAdapter<C> {}

#[async_trait]
impl<C: ClusterConnector> ContainerLifecycle for ClusterAdapter<C> {
    fn backend(&self) -> BackendKind {
        BACKEND
    }

    fn supports(&self, operation: Operation) -> bool {
        !UNSUPPORTED.contains(&operation)
    }

    async fn list(&self) -> Result<Vec<ContainerRecord>> {
        guard(BACKEND, Operation::List, None, self.list_pods()).await
    }

    async fn create(&self, params: &CreateParams) -> Result<CreateOutcome> {
        tracing::debug!(pod = %params.name, image = %params.image, "creating pod");
        ImageRef::parse(&params.image).map_err(|e| invalid_argument(Operation::Create, e))?;

        let ignored = params.option_names();
        if !ignored.is_empty() {
            tracing::warn!(
                pod = %params.name,
                ignored = ?ignored,
                "pod manifests carry only name and image; options ignored"
            );
        }

        guard(
            BACKEND,
            Operation::Create,
            Some(params.name.as_str()),
            self.submit_pod(params),
        )
        .await
    }

    async fn start(&self, id: &str) -> Result<Option<ContainerRecord>> {
        self.skip(Operation::Start, id)
    }

    async fn stop(&self, id: &str) -> Result<Option<ContainerRecord>> {
        self.skip(Operation::Stop, id)
    }

    async fn restart(&self, id: &str) -> Result<Option<ContainerRecord>> {
        self.skip(Operation::Restart, id)
    }

    async fn pause(&self, id: &str) -> Result<Option<ContainerRecord>> {
        self.skip(Operation::Pause, id)
    }

    async fn unpause(&self, id: &str) -> Result<Option<ContainerRecord>> {
        self.skip(Operation::Unpause, id)
    }

    async fn delete(&self, id: &str) -> Result<Option<ContainerRecord>> {
        self.skip(Operation::Delete, id)
    }

    async fn inspect(&self, id: &str) -> Result<Option<StatusDescriptor>> {
        self.skip(Operation::Inspect, id)
    }

    async fn logs(&self, id: &str) -> Result<Option<CommandOutput>> {
        tracing::debug!(pod = id, "fetching pod log");
        guard(BACKEND, Operation::Logs, Some(id), self.read_log(id)).await
    }

    async fn execute(&self, id: &str, command: &str) -> Result<Option<CommandOutput>> {
        tracing::debug!(pod = id, command, "executing in pod");
        let cmd: Vec<String> = parse_command(Operation::Execute, command)?.into();
        guard(BACKEND, Operation::Execute, Some(id), self.exec(id, cmd)).await
    }
}
