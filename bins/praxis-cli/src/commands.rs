use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use praxis_common::config::JudgeConfig;
use praxis_common::types::{ExecutionMode, Language, TestCase, VerdictStatus};
use praxis_judge::{Judge, RunRequest};

fn parse_language(tag: &str) -> Result<Language> {
    match tag.to_lowercase().as_str() {
        "javascript" | "js" => Ok(Language::Javascript),
        "python" | "py" => Ok(Language::Python),
        other => bail!("unsupported language '{}' (expected javascript or python)", other),
    }
}

/// Judge one local source file. Returns whether the verdict is Accepted.
pub async fn run_submission(
    code_path: &Path,
    language: &str,
    inputs: &[String],
    expected: &[String],
    function: Option<&str>,
    execution_only: bool,
) -> Result<bool> {
    let language = parse_language(language)?;
    let code = fs::read_to_string(code_path)
        .with_context(|| format!("failed to read {}", code_path.display()))?;

    if inputs.len() != expected.len() {
        bail!(
            "{} --input values but {} --expected values",
            inputs.len(),
            expected.len()
        );
    }
    let test_cases: Vec<TestCase> = inputs
        .iter()
        .zip(expected)
        .map(|(input, output)| TestCase {
            input: input.clone(),
            output: output.clone(),
        })
        .collect();

    let mode = if execution_only {
        ExecutionMode::ExecutionOnly
    } else {
        ExecutionMode::Strict
    };

    let judge = Judge::new(JudgeConfig::load_default());
    let verdict = judge
        .run(RunRequest {
            code: &code,
            language,
            test_cases: &test_cases,
            expected_name: function,
            mode,
        })
        .await;

    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(verdict.status == VerdictStatus::Accepted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_tags() {
        assert_eq!(parse_language("js").unwrap(), Language::Javascript);
        assert_eq!(parse_language("JavaScript").unwrap(), Language::Javascript);
        assert_eq!(parse_language("python").unwrap(), Language::Python);
        assert!(parse_language("ruby").is_err());
    }
}
