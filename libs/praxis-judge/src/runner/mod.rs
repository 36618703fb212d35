//! Out-of-process language runners.
//!
//! Each invocation spawns a short-lived interpreter subprocess running an
//! embedded companion script, sends one JSON request over stdin, and
//! parses one JSON reply from stdout. Processes are never pooled or
//! reused; submitted code is untrusted and must not observe another
//! submission's execution. The host enforces a hard wall-clock timeout
//! around the whole process and a ceiling on captured output; per-call
//! timeouts are enforced inside the companion scripts.

pub mod javascript;
pub mod python;

use std::process::Stdio;
use std::time::Duration;

use praxis_common::config::JudgeConfig;
use praxis_common::error::{JudgeError, JudgeResult};
use praxis_common::types::Language;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::signature::{CallableKind, ProbeFacts, ResolvedCallable, CONVENTIONAL_NAMES};

/// Execute the bound call and return the raw produced value.
pub async fn run_call(
    language: Language,
    code: &str,
    entry: &ResolvedCallable,
    args: &[Value],
    config: &JudgeConfig,
) -> JudgeResult<Value> {
    match language {
        Language::Javascript => javascript::run_call(code, entry, args, config).await,
        Language::Python => python::run_call(code, entry, args, config).await,
    }
}

/// Execution-only path: load/evaluate the code without calling anything,
/// succeeding iff no exception or non-zero exit occurs.
pub async fn run_script(language: Language, code: &str, config: &JudgeConfig) -> JudgeResult<()> {
    match language {
        Language::Javascript => javascript::run_script(code, config).await,
        Language::Python => python::run_script(code, config).await,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HarnessRequest<'a> {
    pub mode: &'static str,
    pub code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<EntrySpec>,
    pub args: &'a [Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_name: Option<&'a str>,
    pub conventional: &'a [&'a str],
    pub load_timeout_ms: u64,
    pub call_timeout_ms: u64,
}

impl<'a> HarnessRequest<'a> {
    pub fn new(mode: &'static str, code: &'a str, config: &JudgeConfig) -> Self {
        HarnessRequest {
            mode,
            code,
            entry: None,
            args: &[],
            expected_name: None,
            conventional: &CONVENTIONAL_NAMES,
            load_timeout_ms: config.load_timeout_ms,
            call_timeout_ms: config.call_timeout_ms,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EntrySpec {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl From<&ResolvedCallable> for EntrySpec {
    fn from(resolved: &ResolvedCallable) -> Self {
        let (kind, class) = match &resolved.kind {
            CallableKind::Function => ("function", None),
            CallableKind::Method { class } => ("method", Some(class.clone())),
            CallableKind::Export { default: false } => ("export", None),
            CallableKind::Export { default: true } => ("exportDefault", None),
            CallableKind::Deferred => ("deferred", None),
        };
        EntrySpec {
            kind,
            name: resolved.name.clone(),
            class,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HarnessReply {
    pub ok: bool,
    #[serde(default)]
    pub actual: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub probe: Option<ProbeFacts>,
}

impl HarnessReply {
    /// Collapse an `ok: false` reply into the runtime-error channel.
    pub fn into_result(self) -> JudgeResult<Option<Value>> {
        if self.ok {
            Ok(self.actual)
        } else {
            Err(JudgeError::ExecutionFailed(
                self.error
                    .unwrap_or_else(|| "submission failed without a message".to_string()),
            ))
        }
    }
}

/// Spawn the first available interpreter binary, feed it the request, and
/// parse the single-document reply.
///
/// A binary that is not installed triggers fallback to the next
/// candidate; exhausting the list is an explicit "runtime not found"
/// failure, never a hang.
pub(crate) async fn invoke(
    binaries: &[String],
    inline_flag: &str,
    harness: &str,
    request: &HarnessRequest<'_>,
    config: &JudgeConfig,
) -> JudgeResult<HarnessReply> {
    if request.code.len() > config.max_source_bytes {
        return Err(JudgeError::ExecutionFailed(format!(
            "source code exceeds maximum size of {} bytes",
            config.max_source_bytes
        )));
    }

    let payload = serde_json::to_vec(request)
        .map_err(|e| JudgeError::TransportFailure(format!("request encoding failed: {}", e)))?;

    let mut child = None;
    for binary in binaries {
        match Command::new(binary)
            .arg(inline_flag)
            .arg(harness)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(spawned) => {
                debug!(binary = %binary, mode = request.mode, "interpreter spawned");
                child = Some(spawned);
                break;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(binary = %binary, "interpreter binary not found, trying next");
                continue;
            }
            Err(e) => {
                return Err(JudgeError::TransportFailure(format!(
                    "failed to spawn {}: {}",
                    binary, e
                )))
            }
        }
    }
    let mut child = child.ok_or_else(|| {
        JudgeError::InterpreterUnavailable(format!(
            "none of the interpreter binaries {:?} is installed",
            binaries
        ))
    })?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| JudgeError::TransportFailure("interpreter stdin unavailable".to_string()))?;
    stdin
        .write_all(&payload)
        .await
        .map_err(|e| JudgeError::TransportFailure(format!("failed to write request: {}", e)))?;
    drop(stdin);

    let timeout = Duration::from_millis(config.process_timeout_ms);
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(JudgeError::TransportFailure(format!(
                "failed to read interpreter output: {}",
                e
            )))
        }
        // Dropping the wait future kills the child (kill_on_drop).
        Err(_) => {
            return Err(JudgeError::ExecutionFailed(format!(
                "execution timed out after {}ms",
                config.process_timeout_ms
            )))
        }
    };

    let mut stdout = output.stdout;
    stdout.truncate(config.max_output_bytes);
    let text = String::from_utf8_lossy(&stdout);
    let reply_line = text.lines().rev().find(|line| !line.trim().is_empty());

    match reply_line.and_then(|line| serde_json::from_str::<HarnessReply>(line).ok()) {
        Some(reply) => Ok(reply),
        None if !output.status.success() => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(JudgeError::TransportFailure(format!(
                "interpreter exited with {}: {}",
                output.status,
                stderr.lines().last().unwrap_or("no output").trim()
            )))
        }
        None => Err(JudgeError::TransportFailure(
            "malformed interpreter reply".to_string(),
        )),
    }
}
