mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "praxis-cli")]
#[command(about = "Praxis CLI - judge local submissions without the HTTP service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Judge a source file against inline test cases
    Run {
        /// Path to the submission source file
        #[arg(short, long)]
        code: PathBuf,

        /// Submission language (javascript or python)
        #[arg(short, long)]
        language: String,

        /// Test case input, repeatable; paired with --expected by position
        #[arg(short, long)]
        input: Vec<String>,

        /// Expected output, repeatable
        #[arg(short, long)]
        expected: Vec<String>,

        /// Entry-point name the submission is expected to define
        #[arg(long)]
        function: Option<String>,

        /// Only require the code to run without error
        #[arg(long, default_value = "false")]
        execution_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            code,
            language,
            input,
            expected,
            function,
            execution_only,
        } => {
            let accepted = commands::run_submission(
                &code,
                &language,
                &input,
                &expected,
                function.as_deref(),
                execution_only,
            )
            .await?;
            if !accepted {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
