// Judge configuration with teacher-style JSON file loading.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{JudgeError, JudgeResult};

fn default_call_timeout_ms() -> u64 {
    1_000
}

fn default_process_timeout_ms() -> u64 {
    1_500
}

fn default_load_timeout_ms() -> u64 {
    1_000
}

fn default_max_output_bytes() -> usize {
    1024 * 1024
}

fn default_max_source_bytes() -> usize {
    1024 * 1024
}

fn default_node_binaries() -> Vec<String> {
    vec!["node".to_string(), "nodejs".to_string()]
}

fn default_python_binaries() -> Vec<String> {
    vec!["python3".to_string(), "python".to_string()]
}

/// Tunable limits for a judge run.
///
/// `call_timeout_ms` bounds a single in-runtime call (enforced inside the
/// interpreter harness); `process_timeout_ms` wraps the whole interpreter
/// subprocess and must therefore be the larger of the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
    #[serde(default = "default_process_timeout_ms")]
    pub process_timeout_ms: u64,
    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: usize,
    #[serde(default = "default_node_binaries")]
    pub node_binaries: Vec<String>,
    #[serde(default = "default_python_binaries")]
    pub python_binaries: Vec<String>,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        JudgeConfig {
            call_timeout_ms: default_call_timeout_ms(),
            process_timeout_ms: default_process_timeout_ms(),
            load_timeout_ms: default_load_timeout_ms(),
            max_output_bytes: default_max_output_bytes(),
            max_source_bytes: default_max_source_bytes(),
            node_binaries: default_node_binaries(),
            python_binaries: default_python_binaries(),
        }
    }
}

impl JudgeConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> JudgeResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            JudgeError::TransportFailure(format!(
                "failed to read judge config {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            JudgeError::TransportFailure(format!(
                "failed to parse judge config {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load `config/judge.json` if present, defaults otherwise.
    pub fn load_default() -> Self {
        let path = Path::new("config/judge.json");
        if path.exists() {
            Self::load(path).unwrap_or_default()
        } else {
            JudgeConfig::default()
        }
    }
}
