// ABOUTME: Feature flags derived once per engine connection.
// ABOUTME: Replaces per-call version comparisons with resolved booleans.

use crate::types::ApiVersion;

/// First engine API version that takes the memory limit under `HostConfig`.
pub const NESTED_MEMORY_LIMIT_SINCE: ApiVersion = ApiVersion::new(1, 19);

/// What the connected engine and client can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineCapabilities {
    pub api_version: ApiVersion,
    /// Memory limit goes under `HostConfig` instead of the top level.
    pub nested_memory_limit: bool,
    /// Commands run through exec sessions instead of the single-call primitive.
    pub exec_sessions: bool,
}

impl EngineCapabilities {
    pub fn resolve(api_version: ApiVersion, exec_sessions: bool) -> Self {
        Self {
            api_version,
            nested_memory_limit: api_version.at_least(NESTED_MEMORY_LIMIT_SINCE),
            exec_sessions,
        }
    }
}
