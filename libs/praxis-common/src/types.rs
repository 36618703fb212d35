use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Languages the judge can execute. Anything else is rejected at the
/// request boundary before a judge run is ever constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Python,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Javascript => write!(f, "javascript"),
            Language::Python => write!(f, "python"),
        }
    }
}

/// A textual test fixture as authored in the problem definition, e.g.
/// input `nums = [2,7,11,15], target = 9`, output `[0,1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub output: String,
}

/// How a submission is graded.
///
/// `ExecutionOnly` only requires the code to run without error; it is
/// selected by the problem's explicit `execution_only` flag for problems
/// whose fixture format cannot encode expected values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Strict,
    ExecutionOnly,
}

/// Outcome of a single test case.
///
/// `expected` and `actual` hold the canonical serialized form once a value
/// was computed, otherwise the raw fixture text. A failing case carries
/// `error`, a mismatching `actual`, or both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub input: String,
    pub expected: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictStatus {
    Accepted,
    WrongAnswer,
    RuntimeError,
}

/// The structured outcome of grading one submission across all its test
/// cases. Built fresh per run request and never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub runtime_ms: u64,
    pub passed: usize,
    pub total: usize,
    pub results: Vec<CaseResult>,
}

impl Verdict {
    /// Aggregate per-case results into a verdict. Status rules:
    /// every case passed -> Accepted; any case carrying an error ->
    /// RuntimeError; otherwise WrongAnswer.
    pub fn from_results(results: Vec<CaseResult>, runtime_ms: u64) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let status = if passed == total {
            VerdictStatus::Accepted
        } else if results.iter().any(|r| r.error.is_some()) {
            VerdictStatus::RuntimeError
        } else {
            VerdictStatus::WrongAnswer
        };
        Verdict {
            status,
            runtime_ms,
            passed,
            total,
            results,
        }
    }
}

/// A problem as served by the (external) problem store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub starter_code: HashMap<Language, String>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    #[serde(default)]
    pub execution_only: bool,
}

/// Summary persisted by the (external) submission store after a submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub user_id: String,
    pub problem_id: String,
    pub language: Language,
    pub code: String,
    pub status: VerdictStatus,
    pub runtime_ms: u64,
    pub created_at: DateTime<Utc>,
}
