// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::format::Format;
use crate::preset::Preset;

/// Command-line arguments for `launchset`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "launchset",
    version,
    about = "Validate, inspect and render process-manager descriptor sets.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LAUNCHSET_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Load and validate descriptor files.
    Validate(ValidateArgs),

    /// Print apps, roles and launch totals of a descriptor file.
    Show {
        /// Descriptor file (.js, .cjs, .json or .toml).
        path: PathBuf,
    },

    /// Write a descriptor set from a preset or another descriptor file.
    Render(RenderArgs),

    /// Print the launch environment of one app as KEY=VALUE lines.
    Env(EnvArgs),

    /// Print a content fingerprint of a descriptor file.
    Digest {
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Descriptor files to validate.
    pub paths: Vec<PathBuf>,

    /// Also validate every descriptor file found in this directory.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// File-name glob used with `--dir` (repeatable).
    ///
    /// Default: `ecosystem*.config.*`.
    #[arg(long, value_name = "GLOB", requires = "dir")]
    pub pattern: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Built-in deployment variant to render.
    #[arg(long, value_enum, conflicts_with = "from", required_unless_present = "from")]
    pub preset: Option<Preset>,

    /// Existing descriptor file to convert.
    #[arg(long, value_name = "PATH")]
    pub from: Option<PathBuf>,

    /// Output format. Defaults to the extension of `--output`, else `js`.
    #[arg(long, value_enum)]
    pub format: Option<Format>,

    /// Write here instead of stdout.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Artifact path for presets.
    #[arg(long, value_name = "PATH", requires = "preset")]
    pub entry_point: Option<PathBuf>,

    /// `NODE_ENV` value for presets.
    #[arg(long, value_name = "TIER", requires = "preset")]
    pub tier: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct EnvArgs {
    pub path: PathBuf,

    /// App whose environment to print.
    #[arg(long)]
    pub app: String,

    /// Instance index.
    #[arg(long, default_value_t = 0)]
    pub instance: u32,

    /// Start from the current process environment instead of an empty one.
    #[arg(long)]
    pub inherit: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
