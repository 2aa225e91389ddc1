//! reponse CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "reponse", version, about = "Tiered French answer evaluation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single answer from a JSON request file
    Evaluate {
        /// Path to the evaluation request JSON
        #[arg(long)]
        request: PathBuf,

        /// Caller key used for rate limiting
        #[arg(long, default_value = "cli")]
        caller: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Reclassify question difficulties through the external rater
    Reclassify {
        /// Path to the questions JSON file
        #[arg(long)]
        questions: PathBuf,

        /// Where to save the run report JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and example question file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reponse=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            request,
            caller,
            config,
        } => commands::evaluate::execute(request, caller, config).await,
        Commands::Reclassify {
            questions,
            report,
            config,
        } => commands::reclassify::execute(questions, report, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
