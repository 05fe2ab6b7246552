//! CLI entry point for the `otl` command-line tool.

use std::io::Read;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use outliner::cli::commands;
use outliner::config::OutlineConfig;
use outliner::OutlineError;

#[derive(Parser)]
#[command(name = "otl", about = "Multi-context outliner: thoughts that live in many places")]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text", global = true)]
    format: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Snapshot file (defaults to the configured data file)
    #[arg(long, short, global = true)]
    file: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty snapshot file
    Create,
    /// Display information about a snapshot file
    Info,
    /// Add a thought under a parent ("a/b"; empty for the top level)
    Add {
        /// Parent path
        parent: String,
        /// The thought value
        value: String,
        /// Explicit rank (default: after the last child)
        #[arg(long)]
        rank: Option<f64>,
    },
    /// Move a thought and its subtree under a new parent
    Move {
        /// Path of the thought to move
        source: String,
        /// New parent path (empty for the top level)
        dest: String,
        /// Rank in the new parent (default: after the last child)
        #[arg(long)]
        rank: Option<f64>,
    },
    /// Import text, HTML or an indented outline after a target thought
    Import {
        /// Target path (empty to append at the top level)
        target: String,
        /// Text to import
        #[arg(long, conflicts_with = "input")]
        text: Option<String>,
        /// File to import ("-" for stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Delete a thought and its subtree
    Delete {
        /// Path of the thought
        target: String,
    },
    /// Print the outline as a tree
    Show,
    /// Search thought values
    Search {
        /// Substring to look for
        query: String,
        /// Maximum results
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Toggle the pin that keeps a thought expanded
    Pin {
        /// Path of the thought
        target: String,
    },
    /// Verify index consistency
    Check,
}

fn read_input(text: Option<String>, input: Option<PathBuf>) -> Result<String, OutlineError> {
    match (text, input) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) if path.as_os_str() == "-" => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match &cli.config {
        Some(path) => match OutlineConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(5);
            }
        },
        None => OutlineConfig::load_or_default(),
    };
    let file = cli.file.clone().unwrap_or_else(|| config.data_file.clone());

    let result = match cli.command {
        Commands::Create => commands::cmd_create(&file, &config),
        Commands::Info => commands::cmd_info(&file, json),
        Commands::Add {
            parent,
            value,
            rank,
        } => commands::cmd_add(&file, &parent, &value, rank, &config, json),
        Commands::Move { source, dest, rank } => {
            commands::cmd_move(&file, &source, &dest, rank, &config, json)
        }
        Commands::Import {
            target,
            text,
            input,
        } => read_input(text, input)
            .and_then(|raw| commands::cmd_import(&file, &target, &raw, &config, json)),
        Commands::Delete { target } => commands::cmd_delete(&file, &target, &config, json),
        Commands::Show => commands::cmd_show(&file, json),
        Commands::Search { query, limit } => {
            commands::cmd_search(&file, &query, limit.unwrap_or(config.search_limit), json)
        }
        Commands::Pin { target } => commands::cmd_pin(&file, &target, &config, json),
        Commands::Check => commands::cmd_check(&file, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match &e {
            OutlineError::Io(_) => 1,
            OutlineError::InvalidMagic
            | OutlineError::UnsupportedVersion(_)
            | OutlineError::Truncated
            | OutlineError::Compression(_)
            | OutlineError::Json(_) => 2,
            OutlineError::ThoughtNotFound(_) | OutlineError::EmptyPath => 4,
            _ => 5,
        };
        process::exit(code);
    }
}
