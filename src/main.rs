// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Relgraph CLI - release history graphs for version tags

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use relgraph::commands::{self, graph::GraphArgs, EntrySource};
use relgraph::config;

#[derive(Parser)]
#[command(name = "relgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "RELGRAPH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(
        long,
        env = "NO_COLOR",
        global = true,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how version strings are classified
    Parse {
        /// Version strings to parse
        #[arg(required = true)]
        versions: Vec<String>,
    },

    /// Build the release graph and export it
    Graph {
        /// JSON file of version entries ('-' for stdin)
        #[arg(short, long, conflicts_with = "git")]
        input: Option<PathBuf>,

        /// Read tags from this git repository (default: current directory)
        #[arg(long)]
        git: Option<PathBuf>,

        /// Output format (svg, dot, json)
        #[arg(short, long, default_value = "svg")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show releases with their hotfixes as a tree
    Tree {
        /// JSON file of version entries ('-' for stdin)
        #[arg(short, long, conflicts_with = "git")]
        input: Option<PathBuf>,

        /// Read tags from this git repository (default: current directory)
        #[arg(long)]
        git: Option<PathBuf>,
    },

    /// Print a repository's tags as version entries (JSON)
    Tags {
        /// Repository path
        #[arg(default_value = ".")]
        repo: PathBuf,
    },

    /// Inspect or initialize settings
    Config {
        /// Action: show, path, init
        #[arg(default_value = "show")]
        action: String,

        /// Overwrite an existing file on init
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn init_logging(verbose: u8, quiet: bool, configured: Option<&str>) {
    let level = match verbose {
        0 if quiet => "error",
        0 => configured.unwrap_or("info"),
        1 => "debug",
        _ => "trace",
    };

    let filter = if verbose == 0 && !quiet {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = config::load(cli.config.as_deref());
    let configured_level = loaded.as_ref().ok().map(|s| s.log_level.clone());
    init_logging(cli.verbose, cli.quiet, configured_level.as_deref());

    let color = !cli.no_color && std::io::stdout().is_terminal();

    // These must work even when the settings file is broken
    match &cli.command {
        Commands::Config { action, force } => {
            return commands::config::run(action, cli.config.as_deref(), *force);
        }
        Commands::Completions { shell } => {
            return commands::completions::run(*shell, &mut Cli::command());
        }
        _ => {}
    }

    let settings = loaded.context("Failed to load settings")?;

    match cli.command {
        Commands::Parse { versions } => commands::parse::run(&versions, &settings, cli.json),
        Commands::Graph { input, git, format, output } => {
            let format = if cli.json { "json".to_string() } else { format };
            commands::graph::run(
                GraphArgs {
                    source: EntrySource::from_flags(input, git),
                    format,
                    output,
                },
                &settings,
            )
        }
        Commands::Tree { input, git } => {
            commands::tree::run(&EntrySource::from_flags(input, git), &settings, cli.json, color)
        }
        Commands::Tags { repo } => commands::tags::run(&repo),
        Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
    }
}
