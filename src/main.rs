use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod bank;
mod commands;
mod config;
mod error;
mod exam;
mod extract;
mod output;
mod report;
mod score;

use crate::config::{Config, Overrides};

#[derive(Parser)]
#[command(name = "exam-room", about = "Timed multiple-choice practice exams")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a timed exam in the terminal
    Take {
        /// Question bank to draw from
        #[arg(long)]
        bank: Option<PathBuf>,
        /// Number of questions
        #[arg(long)]
        count: Option<usize>,
        /// Time limit in minutes
        #[arg(long)]
        minutes: Option<u64>,
        /// Seed for a reproducible exam
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Validate a question bank file and make it the default bank
    Import {
        file: PathBuf,
    },
    /// Turn exam text extracted from a PDF into a question bank
    Extract {
        input: PathBuf,
        #[arg(long, default_value = commands::extract::DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Also write a sample exam of this many questions
        #[arg(long)]
        sample: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Take {
            bank,
            count,
            minutes,
            seed,
        } => {
            let config = Config::load(&Overrides {
                bank_path: bank,
                question_count: count,
                duration_minutes: minutes,
                export_dir: None,
            })?;
            commands::take::run(&config, seed)
        }
        Commands::Import { file } => {
            let config = Config::load(&Overrides::default())?;
            commands::import::run(&file, &config.bank_path)
        }
        Commands::Extract {
            input,
            output,
            sample,
        } => commands::extract::run(&input, &output, sample),
    }
}
