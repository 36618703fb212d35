use thiserror::Error;

/// Failure taxonomy of the judge.
///
/// Every variant degrades to a `CaseResult.error` string (per-case
/// failures) or an all-failing verdict (resolution failures); none of
/// them is ever fatal to the host process. Timeouts are deliberately
/// reported as `ExecutionFailed`; callers cannot distinguish an
/// infinite loop from a thrown exception from the verdict alone.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// Literal/assignment text was malformed or exceeded parser limits.
    #[error("parse failure: {0}")]
    ParseFailure(String),

    /// No callable entry point could be bound for the submission.
    #[error("{0}")]
    ResolutionFailure(String),

    /// The submitted code threw, timed out, or otherwise failed at runtime.
    #[error("{0}")]
    ExecutionFailed(String),

    /// No candidate interpreter binary could be spawned on this host.
    #[error("runtime not found: {0}")]
    InterpreterUnavailable(String),

    /// The interpreter process produced a malformed or absent reply.
    #[error("interpreter transport failure: {0}")]
    TransportFailure(String),
}

pub type JudgeResult<T> = Result<T, JudgeError>;
