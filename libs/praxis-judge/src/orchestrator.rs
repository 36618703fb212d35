//! Execution orchestration: drives parsing, binding, execution and
//! comparison over all test cases of one submission and aggregates the
//! verdict.
//!
//! Every per-case failure is captured locally; a resolution failure
//! short-circuits into an all-failing verdict with a shared message.
//! Nothing here is fatal to the host.

use std::time::Instant;

use praxis_common::config::JudgeConfig;
use praxis_common::error::JudgeResult;
use praxis_common::types::{CaseResult, ExecutionMode, Language, TestCase, Verdict};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::binder::bind_arguments;
use crate::canonical::canonical_string;
use crate::literal;
use crate::runner;
use crate::signature::{self, ResolvedCallable};

/// One submission to judge.
#[derive(Debug, Clone)]
pub struct RunRequest<'a> {
    pub code: &'a str,
    pub language: Language,
    pub test_cases: &'a [TestCase],
    /// Function name advertised by the problem's starter code, if any.
    pub expected_name: Option<&'a str>,
    pub mode: ExecutionMode,
}

pub struct Judge {
    config: JudgeConfig,
}

impl Judge {
    pub fn new(config: JudgeConfig) -> Self {
        Judge { config }
    }

    pub fn with_defaults() -> Self {
        Judge::new(JudgeConfig::default())
    }

    /// Grade one submission. Always returns a well-formed verdict.
    pub async fn run(&self, request: RunRequest<'_>) -> Verdict {
        let started = Instant::now();
        info!(
            language = %request.language,
            mode = ?request.mode,
            test_cases = request.test_cases.len(),
            source_size = request.code.len(),
            "judging submission"
        );

        if request.mode == ExecutionMode::ExecutionOnly {
            return self.run_execution_only(&request, started).await;
        }

        // Resolve the entry point once per submission. For JavaScript
        // this includes the single runtime probe; a load/compile error
        // here fails every case with the same message.
        let facts = match request.language {
            Language::Javascript => {
                match runner::javascript::probe(request.code, request.expected_name, &self.config)
                    .await
                {
                    Ok(facts) => Some(facts),
                    Err(e) => {
                        warn!(error = %e, "submission failed to load");
                        return all_failing(request.test_cases, &e.to_string(), started);
                    }
                }
            }
            Language::Python => None,
        };

        let resolved = match signature::resolve(
            request.language,
            request.code,
            request.expected_name,
            facts.as_ref(),
        ) {
            Ok(resolved) => {
                debug!(entry = ?resolved.name, kind = ?resolved.kind, "entry point resolved");
                resolved
            }
            Err(e) => {
                warn!(error = %e, "entry point resolution failed");
                return all_failing(request.test_cases, &e.to_string(), started);
            }
        };

        let mut results = Vec::with_capacity(request.test_cases.len());
        for case in request.test_cases {
            let result = match self.evaluate_case(&request, &resolved, case).await {
                Ok(result) => result,
                // The case's own parse/bind/run failure; later cases
                // still run.
                Err(e) => failed_case(case, e.to_string()),
            };
            results.push(result);
        }

        let verdict = Verdict::from_results(results, elapsed_ms(started));
        info!(
            status = ?verdict.status,
            passed = verdict.passed,
            total = verdict.total,
            runtime_ms = verdict.runtime_ms,
            "verdict ready"
        );
        verdict
    }

    async fn evaluate_case(
        &self,
        request: &RunRequest<'_>,
        resolved: &ResolvedCallable,
        case: &TestCase,
    ) -> JudgeResult<CaseResult> {
        let parsed = literal::parse_assignments(&case.input)?;
        let args: Vec<Value> = if parsed.is_empty() && !case.input.trim().is_empty() {
            // A bare literal fixture is a single positional argument.
            vec![literal::parse_value(case.input.trim())?]
        } else {
            bind_arguments(resolved, &parsed)
        };

        let actual = runner::run_call(
            request.language,
            request.code,
            resolved,
            &args,
            &self.config,
        )
        .await?;

        match request.mode {
            ExecutionMode::Strict => {
                let expected = literal::parse_value(case.output.trim())?;
                let expected_text = canonical_string(&expected);
                let actual_text = canonical_string(&actual);
                let passed = expected_text == actual_text;
                Ok(CaseResult {
                    input: case.input.clone(),
                    expected: expected_text,
                    actual: Some(actual_text),
                    passed,
                    error: None,
                })
            }
            // Any non-strict mode: surviving execution is passing.
            ExecutionMode::ExecutionOnly => Ok(CaseResult {
                input: case.input.clone(),
                expected: case.output.clone(),
                actual: Some(canonical_string(&actual)),
                passed: true,
                error: None,
            }),
        }
    }

    /// Execution-only grading: load/evaluate the code without calling a
    /// resolved function; success is the absence of an error. A single
    /// synthetic case stands in when the problem defines none.
    async fn run_execution_only(&self, request: &RunRequest<'_>, started: Instant) -> Verdict {
        let synthetic = [TestCase {
            input: String::new(),
            output: String::new(),
        }];
        let cases: &[TestCase] = if request.test_cases.is_empty() {
            &synthetic
        } else {
            request.test_cases
        };

        let mut results = Vec::with_capacity(cases.len());
        for case in cases {
            let result = match runner::run_script(request.language, request.code, &self.config)
                .await
            {
                Ok(()) => CaseResult {
                    input: case.input.clone(),
                    expected: case.output.clone(),
                    actual: None,
                    passed: true,
                    error: None,
                },
                Err(e) => failed_case(case, e.to_string()),
            };
            results.push(result);
        }
        Verdict::from_results(results, elapsed_ms(started))
    }
}

fn failed_case(case: &TestCase, error: String) -> CaseResult {
    CaseResult {
        input: case.input.clone(),
        expected: case.output.clone(),
        actual: None,
        passed: false,
        error: Some(error),
    }
}

/// Resolution failed for the whole submission: every case fails with the
/// shared message. A synthetic case keeps the verdict from degenerating
/// to Accepted when the problem defines no test cases.
fn all_failing(test_cases: &[TestCase], message: &str, started: Instant) -> Verdict {
    let results: Vec<CaseResult> = if test_cases.is_empty() {
        vec![failed_case(
            &TestCase {
                input: String::new(),
                output: String::new(),
            },
            message.to_string(),
        )]
    } else {
        test_cases
            .iter()
            .map(|case| failed_case(case, message.to_string()))
            .collect()
    };
    Verdict::from_results(results, elapsed_ms(started))
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
