//! Integration tests for kiln
//!
//! These tests require a real C compiler (gcc) on PATH.
//! Run with: cargo test -p kiln --features integration-tests

#![cfg(feature = "integration-tests")]

use std::fs;
use std::path::Path;

use kiln::{Config, Sandbox, SubmitRequest};

mod compilation;
mod execution;
mod sandbox_lifecycle;
mod timeouts;

const FIXTURES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

/// Helper to get fixture file content
pub(crate) fn fixture_source(name: &str) -> String {
    let path = format!("{FIXTURES_PATH}/sources/{name}");
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read fixture {path}: {e}"))
}

/// Sandbox rooted at a caller-owned directory so tests can inspect cleanup
pub(crate) fn test_sandbox(workspace_root: &Path) -> Sandbox {
    Sandbox::new(Config {
        workspace_root: Some(workspace_root.to_path_buf()),
        ..Default::default()
    })
}

pub(crate) fn submit(source: String, stdin: Option<&str>) -> SubmitRequest {
    SubmitRequest {
        source,
        stdin: stdin.map(str::to_owned),
    }
}
