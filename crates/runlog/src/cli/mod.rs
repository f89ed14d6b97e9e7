//! Command-line interface for runlog.
//!
//! This module provides the CLI structure for the `runlog` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, ImportCommand, ListCommand,
    OutputFormat, ResetCommand, RunFields, ShellCommand, ShowCommand, StatusCommand,
};

/// runlog - Keep a log of your runs
///
/// Record each run's date, distance, duration and notes, list them, and
/// edit or delete entries by their position in the list.
#[derive(Debug, Parser)]
#[command(name = "runlog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all runs
    List(ListCommand),

    /// Add a run
    Add(AddCommand),

    /// Change fields of a run
    Edit(EditCommand),

    /// Show one run as it appears on the form
    Show(ShowCommand),

    /// Delete a run; later runs move up one id
    Delete(DeleteCommand),

    /// Start an interactive editing session
    Shell(ShellCommand),

    /// Show storage status
    Status(StatusCommand),

    /// Print the stored run list as JSON
    Export,

    /// Replace the stored run list with one read from a JSON file
    Import(ImportCommand),

    /// Remove all stored runs
    Reset(ResetCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
