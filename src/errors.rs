// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchsetError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unsupported descriptor format: {0}")]
    UnsupportedFormat(String),

    #[error("JS syntax error at line {line}, column {column}: {message}")]
    JsSyntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML rendering error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    #[error("descriptor set must contain at least one app")]
    EmptySet,

    #[error("duplicate app name '{0}'")]
    DuplicateName(String),

    #[error("app '{app}' has invalid instances {value} (must be >= 1)")]
    InvalidInstances { app: String, value: u32 },

    #[error("app '{app}' uses script {found:?}, but the set shares {expected:?}")]
    MixedEntryPoints {
        app: String,
        expected: PathBuf,
        found: PathBuf,
    },

    #[error("app '{app}' has a non-absolute script path {script:?}")]
    RelativeEntryPoint { app: String, script: PathBuf },

    #[error("app '{app}' has {flag}={value:?} (expected \"true\" or \"false\")")]
    InvalidFlagValue {
        app: String,
        flag: String,
        value: String,
    },

    #[error("app '{app}' enables more than one role flag: {}", .flags.join(", "))]
    ConflictingRoles { app: String, flags: Vec<String> },

    #[error("app '{app}' has invalid environment variable name {key:?}")]
    InvalidEnvKey { app: String, key: String },

    #[error("App not found: {0}")]
    AppNotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LaunchsetError>;
