// ABOUTME: In-memory single-host engine for adapter tests.
// ABOUTME: Records every call and lets tests inject API or connection failures.

use async_trait::async_trait;
use berth::engine::{
    ContainerAction, CreateConfig, EngineClient, EngineConnector, EngineError, ExecSpec,
    InstanceDetail,
};
use berth::types::ApiVersion;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct EngineState {
    pub instances: Vec<InstanceDetail>,
    pub states: HashMap<String, serde_json::Value>,
    pub logs: HashMap<String, String>,
    pub pulls: Vec<(String, Option<String>)>,
    pub created: Vec<CreateConfig>,
    pub actions: Vec<(String, ContainerAction)>,
    pub removed: Vec<String>,
    pub exec_specs: Vec<ExecSpec>,
    pub single_executes: Vec<Vec<String>>,
    pub list_calls: usize,
    pub fail_list: Option<EngineError>,
    pub fail_pull: Option<EngineError>,
    pub fail_create: Option<EngineError>,
    pub fail_action: Option<EngineError>,
}

/// Shared-state fake; clones see the same containers.
#[derive(Clone)]
pub struct FakeEngine {
    pub state: Arc<Mutex<EngineState>>,
    api_version: ApiVersion,
    exec_sessions: bool,
}

impl FakeEngine {
    pub fn new(api_version: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(EngineState::default())),
            api_version: ApiVersion::parse(api_version).unwrap(),
            exec_sessions: true,
        }
    }

    pub fn without_exec_sessions(mut self) -> Self {
        self.exec_sessions = false;
        self
    }

    /// Add a running instance named `name` with native id `id`.
    pub fn with_instance(self, id: &str, name: &str) -> Self {
        {
            let mut state = self.state.lock();
            state.instances.push(InstanceDetail {
                id: id.to_string(),
                name: name.to_string(),
            });
            state
                .states
                .insert(id.to_string(), json!({"Status": "running", "Running": true}));
            state.logs.insert(id.to_string(), format!("hello from {}\n", name));
        }
        self
    }

    fn known(&self, id: &str) -> Result<(), EngineError> {
        if self.state.lock().instances.iter().any(|i| i.id == id) {
            Ok(())
        } else {
            Err(EngineError::NotFound(format!("No such container: {}", id)))
        }
    }
}

#[async_trait]
impl EngineClient for FakeEngine {
    async fn api_version(&self) -> Result<ApiVersion, EngineError> {
        Ok(self.api_version)
    }

    fn supports_exec_sessions(&self) -> bool {
        self.exec_sessions
    }

    async fn list_instances(&self) -> Result<Vec<InstanceDetail>, EngineError> {
        let mut state = self.state.lock();
        state.list_calls += 1;
        if let Some(err) = state.fail_list.clone() {
            return Err(err);
        }
        Ok(state.instances.clone())
    }

    async fn pull_image(&self, repository: &str, tag: Option<&str>) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        if let Some(err) = state.fail_pull.clone() {
            return Err(err);
        }
        state
            .pulls
            .push((repository.to_string(), tag.map(str::to_string)));
        Ok(())
    }

    async fn inspect_image(&self, _image: &str) -> Result<(), EngineError> {
        Ok(())
    }

    async fn create_container(&self, config: &CreateConfig) -> Result<String, EngineError> {
        let mut state = self.state.lock();
        if let Some(err) = state.fail_create.clone() {
            return Err(err);
        }
        let id = format!("{:012x}", state.created.len() + 1);
        state.created.push(config.clone());
        state.instances.push(InstanceDetail {
            id: id.clone(),
            name: config.name.clone(),
        });
        state
            .states
            .insert(id.clone(), json!({"Status": "created", "Running": false}));
        Ok(id)
    }

    async fn container_action(&self, id: &str, action: ContainerAction) -> Result<(), EngineError> {
        if let Some(err) = self.state.lock().fail_action.clone() {
            return Err(err);
        }
        self.known(id)?;
        self.state.lock().actions.push((id.to_string(), action));
        Ok(())
    }

    async fn remove_container(&self, id: &str) -> Result<(), EngineError> {
        self.known(id)?;
        let mut state = self.state.lock();
        state.instances.retain(|i| i.id != id);
        state.states.remove(id);
        state.removed.push(id.to_string());
        Ok(())
    }

    async fn inspect_state(&self, id: &str) -> Result<serde_json::Value, EngineError> {
        self.state
            .lock()
            .states
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("No such container: {}", id)))
    }

    async fn logs(&self, id: &str) -> Result<String, EngineError> {
        self.known(id)?;
        Ok(self.state.lock().logs.get(id).cloned().unwrap_or_default())
    }

    async fn exec_create(&self, id: &str, spec: &ExecSpec) -> Result<String, EngineError> {
        self.known(id)?;
        let mut state = self.state.lock();
        state.exec_specs.push(spec.clone());
        Ok(format!("exec-{}", state.exec_specs.len()))
    }

    async fn exec_start(&self, exec_id: &str) -> Result<String, EngineError> {
        let state = self.state.lock();
        let index: usize = exec_id
            .trim_start_matches("exec-")
            .parse()
            .map_err(|_| EngineError::NotFound(exec_id.to_string()))?;
        let spec = state
            .exec_specs
            .get(index - 1)
            .ok_or_else(|| EngineError::NotFound(exec_id.to_string()))?;
        Ok(format!("session: {}\n", spec.cmd.join(" ")))
    }

    async fn execute(&self, id: &str, cmd: &[String]) -> Result<String, EngineError> {
        self.known(id)?;
        self.state.lock().single_executes.push(cmd.to_vec());
        Ok(format!("single: {}\n", cmd.join(" ")))
    }
}

/// Hands out clones of one [`FakeEngine`] and counts connections.
pub struct FakeConnector {
    pub engine: FakeEngine,
    pub connects: Arc<AtomicUsize>,
    failures_left: AtomicUsize,
}

impl FakeConnector {
    pub fn new(engine: FakeEngine) -> Self {
        Self {
            engine,
            connects: Arc::new(AtomicUsize::new(0)),
            failures_left: AtomicUsize::new(0),
        }
    }

    /// Fail the first `n` connection attempts.
    pub fn failing_first(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl EngineConnector for FakeConnector {
    type Client = FakeEngine;

    async fn connect(&self) -> Result<FakeEngine, EngineError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(EngineError::Connection(
                "Cannot connect to the Docker daemon".to_string(),
            ));
        }
        Ok(self.engine.clone())
    }
}
