// ABOUTME: In-memory pod API for cluster adapter tests.
// ABOUTME: Records every client call by name.

use async_trait::async_trait;
use berth::cluster::{ClusterClient, ClusterConnector, ClusterError, PodManifest, PodSummary};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct ClusterState {
    pub pods: Vec<PodSummary>,
    pub manifests: Vec<(String, PodManifest)>,
    pub calls: Vec<&'static str>,
    pub last_response: Option<String>,
    pub fail_create: Option<ClusterError>,
    pub fail_list: Option<ClusterError>,
}

#[derive(Clone, Default)]
pub struct FakeCluster {
    pub state: Arc<Mutex<ClusterState>>,
}

impl FakeCluster {
    pub fn with_pod(self, uid: &str, name: &str) -> Self {
        self.state.lock().pods.push(PodSummary {
            uid: uid.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().calls.clone()
    }

    fn find(&self, name: &str) -> Result<(), ClusterError> {
        if self.state.lock().pods.iter().any(|p| p.name == name) {
            Ok(())
        } else {
            Err(ClusterError::NotFound(format!("pods \"{}\" not found", name)))
        }
    }
}

#[async_trait]
impl ClusterClient for FakeCluster {
    async fn list_pods(&self, _namespace: &str) -> Result<Vec<PodSummary>, ClusterError> {
        let mut state = self.state.lock();
        state.calls.push("list_pods");
        if let Some(err) = state.fail_list.clone() {
            return Err(err);
        }
        Ok(state.pods.clone())
    }

    async fn create_pod(
        &self,
        namespace: &str,
        manifest: &PodManifest,
    ) -> Result<PodSummary, ClusterError> {
        let mut state = self.state.lock();
        state.calls.push("create_pod");
        if let Some(err) = state.fail_create.clone() {
            return Err(err);
        }
        let pod = PodSummary {
            uid: format!("uid-{}", state.pods.len() + 1),
            name: manifest.metadata.name.clone(),
        };
        state.pods.push(pod.clone());
        state
            .manifests
            .push((namespace.to_string(), manifest.clone()));
        Ok(pod)
    }

    async fn read_pod_log(&self, _namespace: &str, name: &str) -> Result<String, ClusterError> {
        self.state.lock().calls.push("read_pod_log");
        self.find(name)?;
        let payload = format!("log of {}\n", name);
        self.state.lock().last_response = Some(payload.clone());
        Ok(payload)
    }

    async fn exec_pod(
        &self,
        _namespace: &str,
        name: &str,
        command: &[String],
    ) -> Result<String, ClusterError> {
        self.state.lock().calls.push("exec_pod");
        self.find(name)?;
        let payload = command.join(" ");
        self.state.lock().last_response = Some(payload.clone());
        Ok(payload)
    }

    fn last_response(&self) -> Option<String> {
        self.state.lock().last_response.clone()
    }
}

pub struct FakeClusterConnector {
    pub cluster: FakeCluster,
}

#[async_trait]
impl ClusterConnector for FakeClusterConnector {
    type Client = FakeCluster;

    async fn connect(&self) -> Result<FakeCluster, ClusterError> {
        Ok(self.cluster.clone())
    }
}
