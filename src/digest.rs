// src/digest.rs

//! Content fingerprint of a descriptor set.
//!
//! The hash is taken over the canonical JSON rendering, not the file bytes,
//! so the same set written as JS, JSON or TOML (or with different comments
//! and whitespace) fingerprints identically.

use blake3::Hasher;
use tracing::debug;

use crate::config::model::DescriptorSet;
use crate::errors::Result;

pub fn digest(set: &DescriptorSet) -> Result<String> {
    let canonical = serde_json::to_vec(set)?;

    let mut hasher = Hasher::new();
    hasher.update(&canonical);
    let hash = hasher.finalize().to_hex().to_string();

    debug!(hash = %hash, apps = set.len(), "computed descriptor digest");
    Ok(hash)
}
