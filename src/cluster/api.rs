// ABOUTME: Pod API client over plain HTTP/1 using hyper.
// ABOUTME: One request per call; the last response payload is retained.

use super::client::{ClusterClient, ClusterConnector, ClusterError, PodManifest, PodSummary};
use crate::config::ClusterSettings;
use crate::http::{Endpoint, RawResponse, error_message};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use parking_lot::Mutex;
use serde::Deserialize;
use url::Url;

#[derive(Deserialize)]
struct PodList {
    #[serde(default)]
    items: Vec<PodObject>,
}

#[derive(Deserialize)]
struct PodObject {
    metadata: ObjectMeta,
}

#[derive(Deserialize)]
struct ObjectMeta {
    #[serde(default)]
    name: String,
    #[serde(default)]
    uid: String,
}

impl From<PodObject> for PodSummary {
    fn from(pod: PodObject) -> Self {
        PodSummary {
            uid: pod.metadata.uid,
            name: pod.metadata.name,
        }
    }
}

/// Builds [`HttpClusterClient`]s for the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpClusterConnector {
    settings: ClusterSettings,
}

impl HttpClusterConnector {
    pub fn new(settings: ClusterSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl ClusterConnector for HttpClusterConnector {
    type Client = HttpClusterClient;

    async fn connect(&self) -> Result<HttpClusterClient, ClusterError> {
        HttpClusterClient::new(&self.settings.endpoint)
    }
}

/// Cluster client speaking the core/v1 pod API.
pub struct HttpClusterClient {
    endpoint: Endpoint,
    base_path: String,
    last_response: Mutex<Option<String>>,
}

impl HttpClusterClient {
    /// Bind a client to `base_url`, e.g. `http://127.0.0.1:8080/`.
    pub fn new(base_url: &str) -> Result<Self, ClusterError> {
        let url = Url::parse(base_url)
            .map_err(|e| ClusterError::Connection(format!("invalid endpoint '{}': {}", base_url, e)))?;
        if url.scheme() != "http" {
            return Err(ClusterError::Connection(format!(
                "unsupported endpoint scheme '{}'",
                url.scheme()
            )));
        }
        let endpoint =
            Endpoint::parse(base_url).map_err(|e| ClusterError::Connection(e.to_string()))?;

        Ok(Self {
            endpoint,
            base_path: url.path().trim_end_matches('/').to_string(),
            last_response: Mutex::new(None),
        })
    }

    fn pods_path(&self, namespace: &str) -> String {
        format!(
            "{}/api/v1/namespaces/{}/pods",
            self.base_path,
            urlencoding::encode(namespace)
        )
    }

    fn pod_path(&self, namespace: &str, name: &str, sub: &str) -> String {
        format!(
            "{}/{}/{}",
            self.pods_path(namespace),
            urlencoding::encode(name),
            sub
        )
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse, ClusterError> {
        let mut builder = hyper::Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }
        let req = builder
            .body(Full::new(body.map(Bytes::from).unwrap_or_default()))
            .map_err(|e| ClusterError::Connection(format!("failed to build request: {}", e)))?;

        let resp = self
            .endpoint
            .send(req)
            .await
            .map_err(|e| ClusterError::Connection(e.to_string()))?;

        *self.last_response.lock() = Some(resp.text());
        tracing::debug!(method, uri, status = resp.status.as_u16(), "cluster response");

        if resp.status.as_u16() == 404 {
            return Err(ClusterError::NotFound(error_message(&resp.body)));
        }
        if !resp.status.is_success() {
            return Err(ClusterError::Api {
                status: resp.status.as_u16(),
                message: error_message(&resp.body),
            });
        }

        Ok(resp)
    }
}

/// `command=..&stdout=true&stderr=true`, one `command` pair per argument.
fn exec_query(command: &[String]) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for arg in command {
        query.append_pair("command", arg);
    }
    query.append_pair("stdout", "true");
    query.append_pair("stderr", "true");
    query.finish()
}

#[async_trait]
impl ClusterClient for HttpClusterClient {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodSummary>, ClusterError> {
        let resp = self.request("GET", &self.pods_path(namespace), None).await?;
        let list: PodList =
            serde_json::from_slice(&resp.body).map_err(|e| ClusterError::Decode(e.to_string()))?;
        Ok(list.items.into_iter().map(PodSummary::from).collect())
    }

    async fn create_pod(
        &self,
        namespace: &str,
        manifest: &PodManifest,
    ) -> Result<PodSummary, ClusterError> {
        let body = serde_json::to_vec(manifest).map_err(|e| ClusterError::Decode(e.to_string()))?;
        let resp = self
            .request("POST", &self.pods_path(namespace), Some(body))
            .await?;
        let pod: PodObject =
            serde_json::from_slice(&resp.body).map_err(|e| ClusterError::Decode(e.to_string()))?;
        Ok(pod.into())
    }

    async fn read_pod_log(&self, namespace: &str, name: &str) -> Result<String, ClusterError> {
        let resp = self
            .request("GET", &self.pod_path(namespace, name, "log"), None)
            .await?;
        Ok(resp.text())
    }

    async fn exec_pod(
        &self,
        namespace: &str,
        name: &str,
        command: &[String],
    ) -> Result<String, ClusterError> {
        let uri = format!(
            "{}?{}",
            self.pod_path(namespace, name, "exec"),
            exec_query(command)
        );
        let resp = self.request("POST", &uri, None).await?;
        Ok(resp.text())
    }

    fn last_response(&self) -> Option<String> {
        self.last_response.lock().clone()
    }
}
