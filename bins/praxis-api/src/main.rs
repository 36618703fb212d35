mod handlers;
mod routes;
mod store;

use std::sync::Arc;

use anyhow::Context;
use praxis_common::config::JudgeConfig;
use praxis_common::store::{ProblemStore, SubmissionStore};
use praxis_judge::Judge;
use tokio::net::TcpListener;
use tracing::info;

use store::{MemoryProblemStore, MemorySubmissionStore};

#[derive(Clone)]
pub struct AppState {
    pub problems: Arc<dyn ProblemStore>,
    pub submissions: Arc<dyn SubmissionStore>,
    pub judge: Arc<Judge>,
    pub max_source_bytes: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Praxis API booting...");

    let judge_config = JudgeConfig::load_default();
    let max_source_bytes = judge_config.max_source_bytes;

    let problems_path =
        std::env::var("PROBLEMS_PATH").unwrap_or_else(|_| "config/problems.json".to_string());
    let problems = MemoryProblemStore::load(&problems_path)
        .with_context(|| format!("failed to load problem catalog from {}", problems_path))?;
    info!(count = problems.len(), path = %problems_path, "problem catalog loaded");

    let state = Arc::new(AppState {
        problems: Arc::new(problems),
        submissions: Arc::new(MemorySubmissionStore::default()),
        judge: Arc::new(Judge::new(judge_config)),
        max_source_bytes,
    });

    let app = routes::routes().with_state(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
