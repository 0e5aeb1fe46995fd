// src/format/mod.rs

//! On-disk encodings of a descriptor set.
//!
//! The process manager reads the same `{ apps: [...] }` shape from a JS
//! module, a JSON document or (for this tool) a TOML file with `[[apps]]`
//! tables. All three go through the same serde model in `config::model`.

pub mod js;

use std::fmt;
use std::path::Path;

use clap::ValueEnum;

use crate::config::model::RawDescriptorSet;
use crate::errors::{LaunchsetError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Js,
    Json,
    Toml,
}

impl Format {
    /// Pick a format from a file extension (`.js`, `.cjs`, `.json`, `.toml`).
    pub fn from_path(path: &Path) -> Result<Format> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("js") | Some("cjs") => Ok(Format::Js),
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            _ => Err(LaunchsetError::UnsupportedFormat(format!(
                "{} (expected .js, .cjs, .json or .toml)",
                path.display()
            ))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Js => "js",
            Format::Json => "json",
            Format::Toml => "toml",
        }
    }

    /// Parse text in this format. No semantic validation happens here.
    pub fn parse(&self, text: &str) -> Result<RawDescriptorSet> {
        match self {
            Format::Js => js::parse(text),
            Format::Json => Ok(serde_json::from_str(text)?),
            Format::Toml => Ok(toml::from_str(text)?),
        }
    }

    pub fn render(&self, set: &RawDescriptorSet) -> Result<String> {
        match self {
            Format::Js => Ok(js::render(set)),
            Format::Json => {
                let mut out = serde_json::to_string_pretty(set)?;
                out.push('\n');
                Ok(out)
            }
            Format::Toml => Ok(toml::to_string_pretty(set)?),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
