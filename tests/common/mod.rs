#![allow(dead_code)]

pub use launchset_test_utils::{init_tracing, shipped_descriptor};

use std::io::Write;

use tempfile::NamedTempFile;

/// Write `contents` to a temp file named `ecosystem.<random>.<ext>`.
pub fn descriptor_file(ext: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("ecosystem.")
        .suffix(&format!(".{ext}"))
        .tempfile()
        .expect("create temp descriptor");
    file.write_all(contents.as_bytes())
        .expect("write temp descriptor");
    file
}
