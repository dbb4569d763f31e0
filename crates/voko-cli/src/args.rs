//! Command-line argument definitions for the voko CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. One subcommand per extraction tool; all subcommands
//! share the same input/output options.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line arguments for the voko extraction tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

/// The extraction to run
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract numbered sense definitions keyed by headword
    Senses(CommonArgs),

    /// Extract headwords keyed to their source file
    Headwords(CommonArgs),

    /// Extract root morphemes (variants included) keyed to their source file
    Roots(CommonArgs),
}

impl Command {
    /// The shared options of whichever subcommand was given.
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Senses(common) | Command::Headwords(common) | Command::Roots(common) => common,
        }
    }
}

/// Options shared by every extraction subcommand
#[derive(clap::Args, Debug)]
pub struct CommonArgs {
    /// Directory containing XML files, or a single XML file
    /// (falls back to the configured dictionary path)
    pub path: Option<PathBuf>,

    /// Output JSON file path (default: write to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory containing the grammar files (a `dtd/` subdirectory)
    #[arg(long)]
    pub grammar: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
