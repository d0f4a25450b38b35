//! # Forge CLI
//!
//! Command-line interface for SchemaForge.
//!
//! This crate drives the validation and generation pipeline from the
//! command line against a microservice definition file.
//!
//! ## Commands
//!
//! - `validate` - Validate a microservice file and print the report
//! - `fix` - Plan and apply auto-fixes for fixable violations
//! - `generate` - Generate backend artifacts and update the manifest
//! - `status` - Compare the definition against the recorded manifest
//! - `mark-applied` - Record a migration as applied to production
//!
//! ## Exit codes
//!
//! `0` clean, `1` validation issues remain (or the schema is out of sync),
//! `2` hard error (unreadable file, bad template, write failure).

// Re-export dependencies for use in main.rs
pub use forge_codegen;
pub use forge_core;
pub use forge_ir;

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Argument Types
// ============================================================================

/// SchemaForge command-line interface
#[derive(Debug, Parser)]
#[command(name = "schemaforge", version, about = "Model-driven backend generator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a microservice definition file
    Validate {
        /// Path to the microservice JSON file
        file: PathBuf,

        /// Path to a JSON file holding the bound navigation menus
        #[arg(long)]
        menus: Option<PathBuf>,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Apply auto-fixes for fixable validation issues
    Fix {
        /// Path to the microservice JSON file
        file: PathBuf,

        /// Path to a JSON file holding the bound navigation menus
        #[arg(long)]
        menus: Option<PathBuf>,

        /// Print the fix plan without applying it
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate backend artifacts from a microservice definition
    Generate {
        /// Path to the microservice JSON file
        file: PathBuf,

        /// Output directory for generated code
        #[arg(short, long, default_value = "./generated")]
        out: PathBuf,

        /// Path to a JSON file holding the bound navigation menus
        #[arg(long)]
        menus: Option<PathBuf>,

        /// Skip test scaffold generation
        #[arg(long)]
        no_tests: bool,

        /// Overwrite files that already exist in the output directory
        #[arg(long)]
        overwrite: bool,

        /// Apply auto-fixes before generating and record them in the manifest
        #[arg(long)]
        fix: bool,

        /// Generate even when validation reports issues
        #[arg(long)]
        force: bool,

        /// Recorded in the manifest as the author of this run
        #[arg(long, env = "SCHEMAFORGE_USER", default_value = "schemaforge")]
        generated_by: String,
    },

    /// Compare a microservice definition against its migration manifest
    Status {
        /// Path to the microservice JSON file
        file: PathBuf,

        /// Output directory holding the manifest
        #[arg(short, long, default_value = "./generated")]
        out: PathBuf,
    },

    /// Mark a migration as applied to production
    MarkApplied {
        /// Output directory holding the manifest
        #[arg(short, long, default_value = "./generated")]
        out: PathBuf,

        /// Name of the migration that was applied
        migration: String,

        /// Recorded in the manifest as who marked it
        #[arg(long, env = "SCHEMAFORGE_USER", default_value = "schemaforge")]
        marked_by: String,
    },
}

// ============================================================================
// Entry Point
// ============================================================================

/// Parse arguments from the environment, run the command, and return the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match commands::dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            2
        }
    }
}
