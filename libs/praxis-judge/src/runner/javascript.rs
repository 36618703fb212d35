//! JavaScript runner.
//!
//! The companion script (`harness/runner.js`) evaluates the submission
//! inside a fresh `node:vm` context with a no-op console and no access
//! to the host's globals; `vm` script timeouts bound both the initial
//! load and the actual call. The probe mode reports the facts the
//! signature resolver's runtime steps consume.

use praxis_common::config::JudgeConfig;
use praxis_common::error::{JudgeError, JudgeResult};
use serde_json::Value;

use super::{invoke, EntrySpec, HarnessRequest};
use crate::signature::{ProbeFacts, ResolvedCallable};

const HARNESS: &str = include_str!("harness/runner.js");

/// Load the submission once and report entry-point facts: load errors,
/// the expected name's callability/arity, newly-observed top-level
/// callables in first-seen order, conventional names, and export
/// callability.
pub async fn probe(
    code: &str,
    expected_name: Option<&str>,
    config: &JudgeConfig,
) -> JudgeResult<ProbeFacts> {
    let mut request = HarnessRequest::new("probe", code, config);
    request.expected_name = expected_name;
    let reply = invoke(&config.node_binaries, "-e", HARNESS, &request, config).await?;
    if !reply.ok {
        return Err(JudgeError::ExecutionFailed(
            reply
                .error
                .unwrap_or_else(|| "submission failed to load".to_string()),
        ));
    }
    reply
        .probe
        .ok_or_else(|| JudgeError::TransportFailure("probe reply carried no facts".to_string()))
}

pub async fn run_call(
    code: &str,
    entry: &ResolvedCallable,
    args: &[Value],
    config: &JudgeConfig,
) -> JudgeResult<Value> {
    let mut request = HarnessRequest::new("call", code, config);
    request.entry = Some(EntrySpec::from(entry));
    request.args = args;
    let reply = invoke(&config.node_binaries, "-e", HARNESS, &request, config).await?;
    Ok(reply.into_result()?.unwrap_or(Value::Null))
}

pub async fn run_script(code: &str, config: &JudgeConfig) -> JudgeResult<()> {
    let request = HarnessRequest::new("load", code, config);
    let reply = invoke(&config.node_binaries, "-e", HARNESS, &request, config).await?;
    reply.into_result()?;
    Ok(())
}
