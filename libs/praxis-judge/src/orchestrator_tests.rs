//! End-to-end judging tests.
//!
//! These exercise the real interpreter subprocesses and are ignored by
//! default: run with `cargo test -- --ignored` on a host with `node` and
//! `python3` installed.

use praxis_common::types::{ExecutionMode, Language, TestCase, VerdictStatus};

use crate::orchestrator::{Judge, RunRequest};

fn case(input: &str, output: &str) -> TestCase {
    TestCase {
        input: input.to_string(),
        output: output.to_string(),
    }
}

fn strict<'a>(code: &'a str, language: Language, cases: &'a [TestCase]) -> RunRequest<'a> {
    RunRequest {
        code,
        language,
        test_cases: cases,
        expected_name: None,
        mode: ExecutionMode::Strict,
    }
}

#[tokio::test]
#[ignore] // Requires node
async fn test_two_sum_javascript_accepted() {
    let code = r#"
function twoSum(nums, target) {
    for (let i = 0; i < nums.length; i++) {
        for (let j = i + 1; j < nums.length; j++) {
            if (nums[i] + nums[j] === target) return [i, j];
        }
    }
    return [];
}
"#;
    let cases = vec![
        case("nums = [2,7,11,15], target = 9", "[0,1]"),
        case("nums = [3,2,4], target = 6", "[1,2]"),
    ];
    let judge = Judge::with_defaults();
    let mut request = strict(code, Language::Javascript, &cases);
    request.expected_name = Some("twoSum");
    let verdict = judge.run(request).await;

    assert_eq!(verdict.status, VerdictStatus::Accepted);
    assert_eq!(verdict.passed, 2);
    assert_eq!(verdict.results[0].actual.as_deref(), Some("[0,1]"));
}

#[tokio::test]
#[ignore] // Requires node
async fn test_syntax_error_fails_every_case_with_shared_message() {
    let code = "function broken( { return 1; }";
    let cases = vec![case("a = 1", "1"), case("a = 2", "2"), case("a = 3", "3")];
    let judge = Judge::with_defaults();
    let verdict = judge.run(strict(code, Language::Javascript, &cases)).await;

    assert_eq!(verdict.status, VerdictStatus::RuntimeError);
    assert_eq!(verdict.total, 3);
    assert_eq!(verdict.passed, 0);
    let first = verdict.results[0].error.clone().unwrap();
    assert!(first.contains("SyntaxError"));
    for result in &verdict.results {
        assert_eq!(result.error.as_deref(), Some(first.as_str()));
    }
}

#[tokio::test]
#[ignore] // Requires node
async fn test_wrong_answer_javascript() {
    let code = "function twoSum(nums, target) { return [1, 0]; }";
    let cases = vec![case("nums = [2,7,11,15], target = 9", "[0,1]")];
    let judge = Judge::with_defaults();
    let verdict = judge.run(strict(code, Language::Javascript, &cases)).await;

    assert_eq!(verdict.status, VerdictStatus::WrongAnswer);
    assert_eq!(verdict.results[0].actual.as_deref(), Some("[1,0]"));
    assert!(verdict.results[0].error.is_none());
}

#[tokio::test]
#[ignore] // Requires node
async fn test_class_solution_method_binds_positionally() {
    // Instance method parameter names differ from the fixture names, so
    // binding falls back to declaration order.
    let code = r#"
class Solution {
    twoSum(values, goal) {
        for (let i = 0; i < values.length; i++) {
            for (let j = i + 1; j < values.length; j++) {
                if (values[i] + values[j] === goal) return [i, j];
            }
        }
        return [];
    }
}
"#;
    let cases = vec![case("nums = [2,7,11,15], target = 9", "[0,1]")];
    let judge = Judge::with_defaults();
    let verdict = judge.run(strict(code, Language::Javascript, &cases)).await;

    assert_eq!(verdict.status, VerdictStatus::Accepted);
}

#[tokio::test]
#[ignore] // Requires node
async fn test_execution_only_crash_reports_runtime_error() {
    let code = "throw new Error('boom');";
    let judge = Judge::with_defaults();
    let verdict = judge
        .run(RunRequest {
            code,
            language: Language::Javascript,
            test_cases: &[],
            expected_name: None,
            mode: ExecutionMode::ExecutionOnly,
        })
        .await;

    assert_eq!(verdict.status, VerdictStatus::RuntimeError);
    assert_eq!(verdict.total, 1); // synthetic case
    assert!(verdict.results[0].error.as_deref().unwrap().contains("boom"));
}

#[tokio::test]
#[ignore] // Requires node
async fn test_execution_only_clean_script_accepted() {
    let code = "const x = 1 + 1;";
    let judge = Judge::with_defaults();
    let verdict = judge
        .run(RunRequest {
            code,
            language: Language::Javascript,
            test_cases: &[],
            expected_name: None,
            mode: ExecutionMode::ExecutionOnly,
        })
        .await;

    assert_eq!(verdict.status, VerdictStatus::Accepted);
    assert_eq!(verdict.passed, 1);
}

#[tokio::test]
#[ignore] // Requires node
async fn test_infinite_loop_is_a_runtime_error() {
    let code = "function spin() { while (true) {} }";
    let cases = vec![case("n = 1", "1")];
    let judge = Judge::with_defaults();
    let verdict = judge.run(strict(code, Language::Javascript, &cases)).await;

    // Timeouts are not distinguished from thrown errors.
    assert_eq!(verdict.status, VerdictStatus::RuntimeError);
}

#[tokio::test]
#[ignore] // Requires node
async fn test_console_output_is_not_the_result() {
    let code = r#"
function answer(n) {
    console.log("this must never be the result");
    return n + 1;
}
"#;
    let cases = vec![case("n = 41", "42")];
    let judge = Judge::with_defaults();
    let verdict = judge.run(strict(code, Language::Javascript, &cases)).await;

    assert_eq!(verdict.status, VerdictStatus::Accepted);
}

#[tokio::test]
#[ignore] // Requires python3
async fn test_two_sum_python_accepted() {
    let code = r#"
def two_sum(nums, target):
    for i in range(len(nums)):
        for j in range(i + 1, len(nums)):
            if nums[i] + nums[j] == target:
                return [i, j]
    return []
"#;
    let cases = vec![case("nums = [2,7,11,15], target = 9", "[0,1]")];
    let judge = Judge::with_defaults();
    let verdict = judge.run(strict(code, Language::Python, &cases)).await;

    assert_eq!(verdict.status, VerdictStatus::Accepted);
}

#[tokio::test]
#[ignore] // Requires python3
async fn test_python_class_solution_fallback() {
    // No top-level def: resolution defers to the runtime chain, which
    // finds the Solution method by argument count.
    let code = r#"
class Solution:
    def twoSum(self, nums, target):
        lookup = {}
        for i, n in enumerate(nums):
            if target - n in lookup:
                return [lookup[target - n], i]
            lookup[n] = i
        return []
"#;
    let cases = vec![case("nums = [2,7,11,15], target = 9", "[0,1]")];
    let judge = Judge::with_defaults();
    let verdict = judge.run(strict(code, Language::Python, &cases)).await;

    assert_eq!(verdict.status, VerdictStatus::Accepted);
}

#[tokio::test]
#[ignore] // Requires python3
async fn test_python_runtime_error_captured_per_case() {
    let code = r#"
def f(a):
    if a == 2:
        raise ValueError("bad input")
    return a
"#;
    let cases = vec![case("a = 1", "1"), case("a = 2", "2"), case("a = 3", "3")];
    let judge = Judge::with_defaults();
    let verdict = judge.run(strict(code, Language::Python, &cases)).await;

    // The failing case must not abort the ones after it.
    assert_eq!(verdict.status, VerdictStatus::RuntimeError);
    assert_eq!(verdict.passed, 2);
    assert!(verdict.results[1]
        .error
        .as_deref()
        .unwrap()
        .contains("ValueError"));
}
