// src/config/mod.rs

//! Descriptor set loading and validation.
//!
//! Responsibilities:
//! - Define the serde-backed data model (`model.rs`).
//! - Load descriptor files from disk and discover them (`loader.rs`).
//! - Validate the invariants of a set (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{discover, load_and_validate, load_from_path, load_with, write_to_path};
pub use model::{DescriptorSet, ProcessSpec, RawDescriptorSet};
pub use validate::validate_descriptor_set;
