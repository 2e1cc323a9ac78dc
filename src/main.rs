use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use todo_sync::readme_check::{DEFAULT_EXAMPLE, DEFAULT_README};

mod cmd;

#[derive(Parser)]
#[command(name = "todo-sync")]
#[command(version, about = "Report source-code TODO markers as GitHub issues")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory inside the repository to work from (defaults to the current directory)
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an issue for every marker whose title is not already an open issue
    Sync {
        /// Scan and compare, but do not create any issues
        #[arg(long)]
        dry_run: bool,
    },
    /// List markers in the source tree without contacting the tracker
    Scan,
    /// Check that the example file appears verbatim in the README
    CheckReadme {
        /// Example file, relative to the repository root
        #[arg(long, default_value = DEFAULT_EXAMPLE)]
        example: PathBuf,

        /// README file, relative to the repository root
        #[arg(long, default_value = DEFAULT_README)]
        readme: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("todo_sync={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::Sync { dry_run } => cmd::cmd_sync(&project_dir, *dry_run).await?,
        Commands::Scan => cmd::cmd_scan(&project_dir)?,
        Commands::CheckReadme { example, readme } => {
            if !cmd::cmd_check_readme(&project_dir, example, readme)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
