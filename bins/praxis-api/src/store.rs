// In-memory stand-ins for the external storage collaborators.
//
// Real deployments put problems and submissions behind a database; this
// service only needs the `ProblemStore`/`SubmissionStore` surface, so the
// dev implementation is a JSON-seeded map and a mutex-guarded vec.

use std::collections::HashMap;
use std::fs;
use std::sync::Mutex;

use anyhow::{Context, Result};
use praxis_common::store::{ProblemStore, SubmissionStore};
use praxis_common::types::{Problem, SubmissionRecord};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct ProblemsJson {
    problems: Vec<Problem>,
}

pub struct MemoryProblemStore {
    problems: HashMap<String, Problem>,
}

impl MemoryProblemStore {
    pub fn load(path: &str) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
        let parsed: ProblemsJson =
            serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path))?;

        let mut problems = HashMap::new();
        for problem in parsed.problems {
            problems.insert(problem.id.clone(), problem);
        }
        Ok(MemoryProblemStore { problems })
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }
}

impl ProblemStore for MemoryProblemStore {
    fn get(&self, id: &str) -> Option<Problem> {
        self.problems.get(id).cloned()
    }
}

#[derive(Default)]
pub struct MemorySubmissionStore {
    records: Mutex<Vec<SubmissionRecord>>,
}

impl SubmissionStore for MemorySubmissionStore {
    fn persist(&self, record: SubmissionRecord) -> Uuid {
        let id = record.id;
        self.records.lock().expect("submission store poisoned").push(record);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use praxis_common::types::{Language, VerdictStatus};

    #[test]
    fn test_submission_store_returns_record_id() {
        let store = MemorySubmissionStore::default();
        let id = Uuid::new_v4();
        let got = store.persist(SubmissionRecord {
            id,
            user_id: "u1".to_string(),
            problem_id: "two-sum".to_string(),
            language: Language::Python,
            code: "def f():\n    pass".to_string(),
            status: VerdictStatus::Accepted,
            runtime_ms: 12,
            created_at: Utc::now(),
        });
        assert_eq!(got, id);
    }

    #[test]
    fn test_problem_catalog_parses() {
        let raw = r#"{
            "problems": [{
                "id": "two-sum",
                "title": "Two Sum",
                "starter_code": {"javascript": "var twoSum = function(nums, target) {\n};"},
                "test_cases": [{"input": "nums = [2,7], target = 9", "output": "[0,1]"}]
            }]
        }"#;
        let parsed: ProblemsJson = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.problems.len(), 1);
        assert!(!parsed.problems[0].execution_only);
    }
}
