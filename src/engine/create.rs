// ABOUTME: Engine container-create configuration derived from CreateParams.
// ABOUTME: Places the memory limit according to the engine API version.

use super::capabilities::EngineCapabilities;
use crate::types::CreateParams;
use serde::Serialize;

/// Body of an engine create call, in engine wire casing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateConfig {
    /// Instance name; sent as a query parameter, not in the body.
    #[serde(skip)]
    pub name: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<String>>,
    /// Top-level memory limit understood by engines older than API 1.19.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_config: Option<HostConfigSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostConfigSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<i64>,
}

impl CreateConfig {
    /// Memory limit wherever it was placed.
    pub fn memory_limit(&self) -> Option<i64> {
        self.memory
            .or_else(|| self.host_config.as_ref().and_then(|h| h.memory))
    }

    /// Whether this configuration uses the pre-1.19 top-level layout.
    pub fn is_legacy(&self) -> bool {
        self.memory.is_some()
    }
}

/// Build the create body for `params`.
///
/// `image` is the full reference as given, `cmd` the already split command.
pub fn build_create_config(
    params: &CreateParams,
    cmd: Option<Vec<String>>,
    caps: &EngineCapabilities,
) -> CreateConfig {
    let env = params.environment.as_ref().map(|vars| {
        let mut env: Vec<String> = vars.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        env.sort();
        env
    });

    let mut config = CreateConfig {
        name: params.name.clone(),
        image: params.image.trim().to_string(),
        hostname: params.hostname.clone(),
        cmd,
        env,
        memory: None,
        host_config: None,
    };

    if let Some(memory) = params.memory_limit {
        if caps.nested_memory_limit {
            config.host_config = Some(HostConfigSpec {
                memory: Some(memory),
            });
        } else {
            config.memory = Some(memory);
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApiVersion;

    fn caps(minor: u32) -> EngineCapabilities {
        EngineCapabilities::resolve(ApiVersion::new(1, minor), true)
    }

    #[test]
    fn environment_is_sorted_key_value_pairs() {
        let params = CreateParams::new("web", "nginx")
            .with_env("B", "2")
            .with_env("A", "1");
        let config = build_create_config(&params, None, &caps(41));
        assert_eq!(
            config.env,
            Some(vec!["A=1".to_string(), "B=2".to_string()])
        );
    }

    #[test]
    fn legacy_layout_serializes_top_level_memory() {
        let params = CreateParams::new("web", "nginx:1.25").with_memory_limit(1024);
        let config = build_create_config(&params, None, &caps(18));
        let body = serde_json::to_value(&config).unwrap();
        assert_eq!(body["Memory"], 1024);
        assert!(body.get("HostConfig").is_none());
        assert!(body.get("Name").is_none());
    }

    #[test]
    fn nested_layout_serializes_host_config_memory() {
        let params = CreateParams::new("web", "nginx:1.25").with_memory_limit(1024);
        let config = build_create_config(&params, None, &caps(19));
        let body = serde_json::to_value(&config).unwrap();
        assert_eq!(body["HostConfig"]["Memory"], 1024);
        assert!(body.get("Memory").is_none());
    }

    #[test]
    fn no_memory_means_no_host_config() {
        let params = CreateParams::new("web", "nginx");
        let config = build_create_config(&params, None, &caps(41));
        assert!(config.host_config.is_none());
        assert!(config.memory_limit().is_none());
    }
}
