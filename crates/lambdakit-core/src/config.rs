use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// lambdakit.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KitConfig {
    #[serde(default)]
    pub function: FunctionDefaults,
}

/// Immutable per-project defaults applied to every function construction.
///
/// Passed to the factory by value; never mutated after load, so function
/// construction is order-independent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefaults {
    /// Runtime identifier
    #[serde(default = "default_runtime")]
    pub runtime: String,
    /// Log retention in days
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u32,
    /// Memory allocation in MiB
    #[serde(default = "default_memory_mb")]
    pub memory_mb: u32,
    /// Retry attempts for asynchronous invocation
    #[serde(default)]
    pub retry_attempts: u32,
    /// Environment variables merged into every function's map
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Default for FunctionDefaults {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            log_retention_days: default_log_retention_days(),
            memory_mb: default_memory_mb(),
            retry_attempts: 0,
            env: BTreeMap::new(),
        }
    }
}

impl KitConfig {
    /// Load from lambdakit.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join("lambdakit.toml");
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            Ok(Self::default())
        }
    }
}

fn default_runtime() -> String {
    "python3.13".to_owned()
}

fn default_log_retention_days() -> u32 {
    30
}

fn default_memory_mb() -> u32 {
    128
}
