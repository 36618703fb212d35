// HTTP route handlers for the Praxis API

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use chrono::Utc;
use praxis_common::types::{ExecutionMode, Language, Problem, SubmissionRecord, Verdict};
use praxis_judge::{expected_name_from_starter, RunRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RunPayload {
    pub language: Language,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub submission_id: Uuid,
    #[serde(flatten)]
    pub verdict: Verdict,
}

/// Unwrap the request body, folding deserialization failures (bad JSON,
/// unknown language tag, missing fields) into a 400. The judge itself
/// never sees an unsupported language.
fn accept(
    payload: Result<Json<RunPayload>, JsonRejection>,
    max_source_bytes: usize,
) -> Result<RunPayload, String> {
    let Json(payload) = payload.map_err(|rejection| rejection.body_text())?;
    if payload.code.trim().is_empty() {
        return Err("code must not be empty".to_string());
    }
    if payload.code.len() > max_source_bytes {
        return Err(format!(
            "code exceeds maximum size of {} bytes",
            max_source_bytes
        ));
    }
    Ok(payload)
}

async fn judge_against(state: &AppState, problem: &Problem, payload: &RunPayload) -> Verdict {
    let mode = if problem.execution_only {
        ExecutionMode::ExecutionOnly
    } else {
        ExecutionMode::Strict
    };
    let expected_name = problem
        .starter_code
        .get(&payload.language)
        .and_then(|starter| expected_name_from_starter(starter, payload.language));

    state
        .judge
        .run(RunRequest {
            code: &payload.code,
            language: payload.language,
            test_cases: &problem.test_cases,
            expected_name: expected_name.as_deref(),
            mode,
        })
        .await
}

/// POST /problems/{id}/run - judge anonymously, nothing persisted
pub async fn run_code(
    State(state): State<Arc<AppState>>,
    Path(problem_id): Path<String>,
    payload: Result<Json<RunPayload>, JsonRejection>,
) -> impl IntoResponse {
    let payload = match accept(payload, state.max_source_bytes) {
        Ok(payload) => payload,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
        }
    };

    let Some(problem) = state.problems.get(&problem_id) else {
        warn!(problem_id = %problem_id, "run for unknown problem");
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "problem not found" })),
        )
            .into_response();
    };

    info!(problem_id = %problem_id, language = %payload.language, "run request");
    let verdict = judge_against(&state, &problem, &payload).await;
    (StatusCode::OK, Json(verdict)).into_response()
}

/// POST /problems/{id}/submit - judge and persist the summary
pub async fn submit_code(
    State(state): State<Arc<AppState>>,
    Path(problem_id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<RunPayload>, JsonRejection>,
) -> impl IntoResponse {
    // Authentication itself lives outside this service; the verified
    // identity arrives as a header.
    let Some(user_id) = headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
    else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "authentication required" })),
        )
            .into_response();
    };
    let user_id = user_id.to_string();

    let payload = match accept(payload, state.max_source_bytes) {
        Ok(payload) => payload,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
        }
    };

    let Some(problem) = state.problems.get(&problem_id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "problem not found" })),
        )
            .into_response();
    };

    info!(problem_id = %problem_id, user_id = %user_id, language = %payload.language, "submit request");
    let verdict = judge_against(&state, &problem, &payload).await;

    let submission_id = state.submissions.persist(SubmissionRecord {
        id: Uuid::new_v4(),
        user_id,
        problem_id,
        language: payload.language,
        code: payload.code,
        status: verdict.status,
        runtime_ms: verdict.runtime_ms,
        created_at: Utc::now(),
    });

    (
        StatusCode::CREATED,
        Json(SubmitResponse {
            submission_id,
            verdict,
        }),
    )
        .into_response()
}

/// GET /status - health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
