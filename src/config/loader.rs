// src/config/loader.rs

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info};

use crate::config::model::{DescriptorSet, RawDescriptorSet};
use crate::errors::{LaunchsetError, Result};
use crate::format::Format;
use crate::fs::{FileSystem, RealFileSystem};

/// File-name pattern used when scanning a directory for descriptor files.
pub const DEFAULT_DISCOVERY_PATTERN: &str = "ecosystem*.config.*";

/// Load a descriptor file from a given path and return the raw
/// `RawDescriptorSet`.
///
/// The format is chosen from the file extension. This only performs
/// deserialization; it does **not** perform semantic validation (unique
/// names, shared entry point, role flags). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawDescriptorSet> {
    load_raw_with(&RealFileSystem, path.as_ref())
}

/// Load a descriptor file from path and validate it.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads JS, JSON or TOML.
/// - Applies defaults (`instances = 1`, `exec_mode = "fork"`, `watch = false`).
/// - Checks every invariant of a descriptor set.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<DescriptorSet> {
    let path = path.as_ref();
    validated(path, load_from_path(path)?)
}

/// Same as [`load_and_validate`], through an explicit filesystem.
pub fn load_with(fs: &dyn FileSystem, path: &Path) -> Result<DescriptorSet> {
    validated(path, load_raw_with(fs, path)?)
}

fn validated(path: &Path, raw: RawDescriptorSet) -> Result<DescriptorSet> {
    let set = DescriptorSet::try_from(raw)?;
    info!(path = %path.display(), apps = set.len(), "loaded descriptor set");
    Ok(set)
}

fn load_raw_with(fs: &dyn FileSystem, path: &Path) -> Result<RawDescriptorSet> {
    let format = Format::from_path(path)?;
    let contents = fs.read_to_string(path).map_err(|err| read_error(path, err))?;
    debug!(path = %path.display(), %format, bytes = contents.len(), "parsing descriptor");
    format.parse(&contents)
}

/// Filesystem failures become `IoError`, keeping the path in the message.
fn read_error(path: &Path, err: anyhow::Error) -> LaunchsetError {
    match err.downcast_ref::<std::io::Error>() {
        Some(io) => LaunchsetError::IoError(std::io::Error::new(
            io.kind(),
            format!("reading {}: {io}", path.display()),
        )),
        None => LaunchsetError::Other(err),
    }
}

/// Write a descriptor set to `path`, in the format its extension names.
pub fn write_to_path(fs: &dyn FileSystem, path: &Path, set: &RawDescriptorSet) -> Result<()> {
    let format = Format::from_path(path)?;
    let text = format.render(set)?;
    fs.write(path, text.as_bytes())?;
    info!(path = %path.display(), %format, "wrote descriptor set");
    Ok(())
}

/// List descriptor files directly inside `dir`.
///
/// A file is kept when its file name matches any of `patterns` (globs such as
/// `ecosystem*.config.*`); with no patterns, [`DEFAULT_DISCOVERY_PATTERN`] is
/// used. Results are sorted by path.
pub fn discover(fs: &dyn FileSystem, dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let set = build_pattern_set(patterns)?;

    let mut found: Vec<PathBuf> = fs
        .read_dir(dir)?
        .into_iter()
        .filter(|p| fs.is_file(p))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| set.is_match(name))
        })
        .collect();
    found.sort();

    debug!(dir = %dir.display(), count = found.len(), "discovered descriptor files");
    Ok(found)
}

fn build_pattern_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    if patterns.is_empty() {
        builder.add(compile_glob(DEFAULT_DISCOVERY_PATTERN)?);
    }
    for pat in patterns {
        builder.add(compile_glob(pat)?);
    }
    builder
        .build()
        .map_err(|e| LaunchsetError::Other(anyhow::anyhow!("building glob set: {e}")))
}

fn compile_glob(pattern: &str) -> Result<Glob> {
    Glob::new(pattern)
        .map_err(|e| LaunchsetError::Other(anyhow::anyhow!("invalid glob {pattern:?}: {e}")))
}
