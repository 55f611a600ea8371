//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Headless hot-reload agent mirroring a page from a development server
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: hmr.toml)
    #[arg(short = 'C', long, default_value = "hmr.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Load the page and keep it in sync with the server
    #[command(visible_alias = "c")]
    Connect {
        #[command(flatten)]
        args: AgentArgs,

        /// Write the document to this file after every update
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        snapshot: Option<PathBuf>,
    },

    /// Load and index the page once, then print what is tracked
    #[command(visible_alias = "i")]
    Inspect {
        #[command(flatten)]
        args: AgentArgs,

        /// Print the indexed document instead of the table
        #[arg(long)]
        html: bool,
    },
}

/// Shared arguments for Connect and Inspect commands
#[derive(clap::Args, Debug, Clone)]
pub struct AgentArgs {
    /// Development server origin (e.g., http://127.0.0.1:3000)
    #[arg(short = 'S', long, value_hint = clap::ValueHint::Url)]
    pub server: Option<String>,

    /// Page to mirror (e.g., /blog)
    #[arg(short, long)]
    pub page: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}
