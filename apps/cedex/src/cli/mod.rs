//! # cedex CLI Module
//!
//! ## Available Commands
//!
//! - `export` - Export a source model snapshot into the export root
//! - `check` - Run an export in memory and report statistics
//! - `status` - Show whether a map has been exported
//! - `snapshot` - Convert a JSON snapshot into the binary format

mod commands;

use crate::config::{CONFIG_FILE_NAME, CedexConfig};
use cedex_core::CedexError;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// cedex - legacy cadastral edit history exporter
///
/// Converts the edit history of a legacy cadastral map into the
/// append-only interchange log of the successor editor.
#[derive(Parser, Debug)]
#[command(name = "cedex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Suppress summary output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Encoding of a source model snapshot.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotFormat {
    #[default]
    Json,
    Binary,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a map history into the export root
    Export {
        /// Source model snapshot
        #[arg(short, long)]
        input: PathBuf,

        /// Snapshot encoding
        #[arg(short = 't', long, value_enum, default_value_t = SnapshotFormat::Json)]
        format: SnapshotFormat,

        /// Export root (overrides the configuration file)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Run an export in memory without writing anything
    Check {
        /// Source model snapshot
        #[arg(short, long)]
        input: PathBuf,

        /// Snapshot encoding
        #[arg(short = 't', long, value_enum, default_value_t = SnapshotFormat::Json)]
        format: SnapshotFormat,
    },

    /// Show whether a map has been exported
    Status {
        /// Map name as recorded in the snapshot
        #[arg(short, long)]
        map: String,

        /// Export root (overrides the configuration file)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Convert a JSON snapshot into the binary format
    Snapshot {
        /// JSON snapshot
        #[arg(short, long)]
        input: PathBuf,

        /// Binary snapshot to write
        #[arg(short, long)]
        output: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Output switches shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputMode {
    pub quiet: bool,
    pub json: bool,
}

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), CedexError> {
    let config = CedexConfig::load(&cli.config)?;
    let mode = OutputMode {
        quiet: cli.quiet,
        json: cli.json_mode,
    };

    match cli.command {
        Commands::Export {
            input,
            format,
            root,
        } => cmd_export(&config, mode, &input, format, root.as_deref()),
        Commands::Check { input, format } => cmd_check(&config, mode, &input, format),
        Commands::Status { map, root } => cmd_status(&config, mode, &map, root.as_deref()),
        Commands::Snapshot { input, output } => cmd_snapshot(mode, &input, &output),
    }
}
