//! # lectern CLI
//!
//! Command-line interface for loading, inspecting, and validating a
//! collection of markdown posts with YAML front matter.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lectern")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "lectern.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new lectern project
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// List documents in default order (newest first)
    List {
        /// Only documents in this category (exact match)
        #[arg(long)]
        category: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Fetch a single document by id
    Show {
        /// Document id (e.g., 2024-11-14-java-inheritance)
        id: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = ShowFormat::Json)]
        format: ShowFormat,
    },

    /// Load and validate the collection, emitting diagnostics
    Check {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Copy, Clone, ValueEnum)]
pub enum ShowFormat {
    Json,
    Markdown,
    Frontmatter,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing. Logs go to stderr so `--json` output on stdout
    // stays machine-readable.
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::List { category, json } => {
            commands::list_documents(&cli.config, category.as_deref(), json)
        }
        Commands::Show { id, format } => commands::show_document(&cli.config, &id, format),
        Commands::Check { json } => commands::check_collection(&cli.config, json),
    }
}
