//! Python runner.
//!
//! The companion script (`harness/runner.py`) executes the submission in
//! a scratch namespace with stdout redirected, picks the entry point at
//! call time (the runtime fallback chain lives there, not in the host;
//! only the executing runtime can introspect live objects), and bounds
//! load and call with an interval timer.

use praxis_common::config::JudgeConfig;
use praxis_common::error::JudgeResult;
use serde_json::Value;

use super::{invoke, EntrySpec, HarnessRequest};
use crate::signature::ResolvedCallable;

const HARNESS: &str = include_str!("harness/runner.py");

pub async fn run_call(
    code: &str,
    entry: &ResolvedCallable,
    args: &[Value],
    config: &JudgeConfig,
) -> JudgeResult<Value> {
    let mut request = HarnessRequest::new("call", code, config);
    request.entry = Some(EntrySpec::from(entry));
    request.args = args;
    let reply = invoke(&config.python_binaries, "-c", HARNESS, &request, config).await?;
    Ok(reply.into_result()?.unwrap_or(Value::Null))
}

pub async fn run_script(code: &str, config: &JudgeConfig) -> JudgeResult<()> {
    let request = HarnessRequest::new("load", code, config);
    let reply = invoke(&config.python_binaries, "-c", HARNESS, &request, config).await?;
    reply.into_result()?;
    Ok(())
}
