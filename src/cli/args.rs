//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// pylocate - Identify Python interpreters and describe their environments.
#[derive(Debug, Parser)]
#[command(name = "pylocate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (merged over .pylocate.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Describe the environment of one or more interpreters
    Resolve(ResolveArgs),

    /// List interpreters registered in the Windows registry
    Registry(RegistryArgs),

    /// Show effective configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ResolveArgs {
    /// Interpreter executables to resolve
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Workspace folder (repeatable, replaces configured folders)
    #[arg(short, long = "workspace")]
    pub workspace: Vec<PathBuf>,

    /// Timeout for external tool probes, in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the `registry` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RegistryArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip the 32-bit registry view on a native x86 host
    #[arg(long)]
    pub native_only: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the JSON schema of the configuration file
    #[arg(long)]
    pub schema: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
