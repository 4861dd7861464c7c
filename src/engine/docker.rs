// ABOUTME: Bollard-based engine client and connector.
// ABOUTME: Talks to the Docker Engine API over unix sockets, TCP or TLS.

use super::client::{
    ContainerAction, EngineClient, EngineConnector, EngineError, ExecSpec, InstanceDetail,
};
use super::create::CreateConfig;
use crate::config::EngineSettings;
use crate::http::{Endpoint, TransportError, error_message};
use crate::types::ApiVersion;
use async_trait::async_trait;
use bollard::exec::{StartExecOptions, StartExecResults};
use bollard::models::{ContainerCreateBody, HostConfig};
use bollard::query_parameters::{
    CreateContainerOptions, CreateImageOptions, InspectContainerOptions, ListContainersOptions,
    LogsOptions, RemoveContainerOptions, RestartContainerOptions, StartContainerOptions,
    StopContainerOptions,
};
use bollard::{ClientVersion, Docker};
use bytes::Bytes;
use futures::StreamExt;
use http_body_util::Full;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_engine_error(e: bollard::errors::Error) -> EngineError {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            message,
        } => EngineError::NotFound(message),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } => EngineError::Api {
            status: status_code,
            message,
        },
        bollard::errors::Error::DockerStreamError { error } => EngineError::Stream(error),
        other => EngineError::Connection(other.to_string()),
    }
}

fn map_transport_error(e: TransportError) -> EngineError {
    EngineError::Connection(e.to_string())
}

fn client_version(settings: &EngineSettings) -> Result<ClientVersion, EngineError> {
    match settings.api_version.as_deref() {
        Some(raw) => {
            let version = ApiVersion::parse(raw).map_err(|e| EngineError::Connection(e.to_string()))?;
            Ok(ClientVersion {
                major_version: version.major as usize,
                minor_version: version.minor as usize,
            })
        }
        None => Ok(bollard::API_DEFAULT_VERSION.clone()),
    }
}

// =============================================================================
// BollardConnector
// =============================================================================

/// Opens [`BollardEngine`] connections from [`EngineSettings`].
#[derive(Debug, Clone)]
pub struct BollardConnector {
    settings: EngineSettings,
}

impl BollardConnector {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl EngineConnector for BollardConnector {
    type Client = BollardEngine;

    async fn connect(&self) -> Result<BollardEngine, EngineError> {
        let settings = &self.settings;
        let version = client_version(settings)?;
        let timeout = settings.timeout.as_secs();

        let client = match (&settings.tls, settings.scheme()) {
            (Some(tls), _) => Docker::connect_with_ssl(
                &settings.url,
                &tls.client_key,
                &tls.client_cert,
                &tls.ca_cert,
                timeout,
                &version,
            ),
            (None, Some("https")) => {
                return Err(EngineError::Connection(format!(
                    "{} needs TLS material (docker.tls)",
                    settings.url
                )));
            }
            (None, Some("unix")) => Docker::connect_with_unix(&settings.url, timeout, &version),
            (None, _) => Docker::connect_with_http(&settings.url, timeout, &version),
        }
        .map_err(|e| EngineError::Connection(e.to_string()))?;

        // Raw requests only work without TLS.
        let endpoint = match settings.tls {
            Some(_) => None,
            None => Endpoint::parse(&settings.url).ok(),
        };

        tracing::debug!(url = %settings.url, "engine client created");

        Ok(BollardEngine {
            client,
            endpoint,
            client_version: format!("{}.{}", version.major_version, version.minor_version),
        })
    }
}

// =============================================================================
// BollardEngine
// =============================================================================

/// Engine client backed by bollard.
pub struct BollardEngine {
    client: Docker,
    endpoint: Option<Endpoint>,
    client_version: String,
}

impl BollardEngine {
    /// Create with the pre-1.19 body layout, which the typed create body
    /// cannot carry, by posting the JSON directly.
    async fn create_container_raw(&self, config: &CreateConfig) -> Result<String, EngineError> {
        let endpoint = self.endpoint.as_ref().ok_or_else(|| {
            EngineError::Connection("top-level memory limits need a unix or tcp endpoint".to_string())
        })?;

        let body = serde_json::to_vec(config)
            .map_err(|e| EngineError::Connection(format!("failed to encode create body: {}", e)))?;

        let uri = format!(
            "/v{}/containers/create?name={}",
            self.client_version,
            urlencoding::encode(&config.name)
        );

        let req = hyper::Request::builder()
            .method("POST")
            .uri(&uri)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| EngineError::Connection(format!("failed to build request: {}", e)))?;

        let resp = endpoint.send(req).await.map_err(map_transport_error)?;

        if resp.status.as_u16() == 404 {
            return Err(EngineError::NotFound(error_message(&resp.body)));
        }
        if !resp.status.is_success() {
            return Err(EngineError::Api {
                status: resp.status.as_u16(),
                message: error_message(&resp.body),
            });
        }

        let created: serde_json::Value = serde_json::from_slice(&resp.body)
            .map_err(|e| EngineError::Connection(format!("invalid create response: {}", e)))?;
        created
            .get("Id")
            .and_then(|id| id.as_str())
            .map(str::to_string)
            .ok_or_else(|| EngineError::Connection("create response has no Id".to_string()))
    }
}

#[async_trait]
impl EngineClient for BollardEngine {
    async fn api_version(&self) -> Result<ApiVersion, EngineError> {
        let version = self.client.version().await.map_err(map_engine_error)?;
        let raw = version
            .api_version
            .ok_or_else(|| EngineError::Connection("engine did not report an API version".to_string()))?;
        ApiVersion::parse(&raw).map_err(|e| EngineError::Connection(e.to_string()))
    }

    fn supports_exec_sessions(&self) -> bool {
        true
    }

    async fn list_instances(&self) -> Result<Vec<InstanceDetail>, EngineError> {
        let opts = ListContainersOptions {
            all: true,
            ..Default::default()
        };

        let summaries = self
            .client
            .list_containers(Some(opts))
            .await
            .map_err(map_engine_error)?;

        let mut instances = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let Some(id) = summary.id else { continue };

            // Containers removed between listing and inspection are skipped.
            let details = match self
                .client
                .inspect_container(&id, None::<InspectContainerOptions>)
                .await
            {
                Ok(details) => details,
                Err(bollard::errors::Error::DockerResponseServerError {
                    status_code: 404, ..
                }) => continue,
                Err(e) => return Err(map_engine_error(e)),
            };

            instances.push(InstanceDetail {
                id: details.id.unwrap_or(id),
                name: details
                    .name
                    .unwrap_or_default()
                    .trim_start_matches('/')
                    .to_string(),
            });
        }

        Ok(instances)
    }

    async fn pull_image(&self, repository: &str, tag: Option<&str>) -> Result<(), EngineError> {
        let opts = CreateImageOptions {
            from_image: Some(repository.to_string()),
            tag: tag.map(str::to_string),
            ..Default::default()
        };

        // Pull returns a stream of progress updates - consume it
        let mut stream = self.client.create_image(Some(opts), None, None);
        while let Some(result) = stream.next().await {
            result.map_err(map_engine_error)?;
        }

        Ok(())
    }

    async fn inspect_image(&self, image: &str) -> Result<(), EngineError> {
        self.client
            .inspect_image(image)
            .await
            .map_err(map_engine_error)?;
        Ok(())
    }

    async fn create_container(&self, config: &CreateConfig) -> Result<String, EngineError> {
        if config.is_legacy() {
            return self.create_container_raw(config).await;
        }

        let host_config = config.host_config.as_ref().map(|h| HostConfig {
            memory: h.memory,
            ..Default::default()
        });

        let body = ContainerCreateBody {
            image: Some(config.image.clone()),
            hostname: config.hostname.clone(),
            cmd: config.cmd.clone(),
            env: config.env.clone(),
            host_config,
            ..Default::default()
        };

        let opts = CreateContainerOptions {
            name: Some(config.name.clone()),
            ..Default::default()
        };

        let response = self
            .client
            .create_container(Some(opts), body)
            .await
            .map_err(map_engine_error)?;

        Ok(response.id)
    }

    async fn container_action(
        &self,
        id: &str,
        action: ContainerAction,
    ) -> Result<(), EngineError> {
        match action {
            ContainerAction::Start => {
                self.client
                    .start_container(id, None::<StartContainerOptions>)
                    .await
            }
            ContainerAction::Stop => {
                self.client
                    .stop_container(id, None::<StopContainerOptions>)
                    .await
            }
            ContainerAction::Restart => {
                self.client
                    .restart_container(id, None::<RestartContainerOptions>)
                    .await
            }
            ContainerAction::Pause => self.client.pause_container(id).await,
            ContainerAction::Unpause => self.client.unpause_container(id).await,
        }
        .map_err(map_engine_error)
    }

    async fn remove_container(&self, id: &str) -> Result<(), EngineError> {
        self.client
            .remove_container(id, None::<RemoveContainerOptions>)
            .await
            .map_err(map_engine_error)
    }

    async fn inspect_state(&self, id: &str) -> Result<serde_json::Value, EngineError> {
        let details = self
            .client
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .map_err(map_engine_error)?;

        match details.state {
            Some(state) => serde_json::to_value(state)
                .map_err(|e| EngineError::Connection(format!("failed to encode state: {}", e))),
            None => Ok(serde_json::Value::Null),
        }
    }

    async fn logs(&self, id: &str) -> Result<String, EngineError> {
        let opts = LogsOptions {
            stdout: true,
            stderr: true,
            follow: false,
            tail: "all".to_string(),
            ..Default::default()
        };

        let mut stream = self.client.logs(id, Some(opts));
        let mut output = Vec::new();
        while let Some(chunk) = stream.next().await {
            output.extend_from_slice(&chunk.map_err(map_engine_error)?.into_bytes());
        }

        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    async fn exec_create(&self, id: &str, spec: &ExecSpec) -> Result<String, EngineError> {
        let opts = bollard::models::ExecConfig {
            cmd: Some(spec.cmd.clone()),
            attach_stdin: Some(spec.attach_stdin),
            attach_stdout: Some(spec.attach_stdout),
            attach_stderr: Some(spec.attach_stderr),
            tty: Some(spec.tty),
            ..Default::default()
        };

        let response = self
            .client
            .create_exec(id, opts)
            .await
            .map_err(map_engine_error)?;

        Ok(response.id)
    }

    async fn exec_start(&self, exec_id: &str) -> Result<String, EngineError> {
        let opts = StartExecOptions {
            detach: false,
            ..Default::default()
        };

        let result = self
            .client
            .start_exec(exec_id, Some(opts))
            .await
            .map_err(map_engine_error)?;

        let mut output = Vec::new();
        if let StartExecResults::Attached { output: mut stream, .. } = result {
            while let Some(chunk) = stream.next().await {
                output.extend_from_slice(&chunk.map_err(map_engine_error)?.into_bytes());
            }
        }

        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    async fn execute(&self, id: &str, cmd: &[String]) -> Result<String, EngineError> {
        let exec_id = self.exec_create(id, &ExecSpec::capture(cmd.to_vec())).await?;
        self.exec_start(&exec_id).await
    }
}
