//! matriq CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod render;
mod screens;

#[derive(Parser)]
#[command(name = "matriq", version, about = "Matrix-reasoning quiz in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take the test
    Run {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Questions per session (overrides config)
        #[arg(long)]
        questions: Option<usize>,

        /// Seconds per question (overrides config)
        #[arg(long)]
        time_per_question: Option<u32>,

        /// Use local sample puzzles; no network or API key needed
        #[arg(long)]
        offline: bool,

        /// Output directory for result artifacts (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Artifact formats: json, html, markdown, all
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Re-render a saved report
    Show {
        /// Report JSON path
        #[arg(long)]
        report: PathBuf,

        /// Output format: text, markdown, html
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Fetch and print one puzzle (provider smoke check)
    Preview {
        /// Difficulty on the 1-10 scale
        #[arg(long, default_value = "5")]
        difficulty: u8,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use local sample puzzles
        #[arg(long)]
        offline: bool,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("matriq=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            questions,
            time_per_question,
            offline,
            output,
            format,
        } => {
            commands::run::execute(config, questions, time_per_question, offline, output, format)
                .await
        }
        Commands::Show { report, format } => commands::show::execute(report, format),
        Commands::Preview {
            difficulty,
            config,
            offline,
        } => commands::preview::execute(difficulty, config, offline).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
