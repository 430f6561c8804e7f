//! Tests for the `xlsx2pdf` binary's console behaviour.

#![cfg(feature = "cli")]

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

fn xlsx2pdf(args: &[&OsStr], weasyprint_path: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_xlsx2pdf"))
        .args(args)
        .arg("--no-progress")
        .env("WEASYPRINT_PATH", weasyprint_path)
        .env_remove("RUST_LOG")
        .env_remove("XLSX2PDF_WEASYPRINT")
        .output()
        .unwrap()
}

#[test]
fn test_missing_input_dir_is_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nonexistent_input");
    let output = dir.path().join("out");

    let out = xlsx2pdf(
        &[input.as_os_str(), OsStr::new("-o"), output.as_os_str()],
        &dir.path().join("no-weasyprint-here"),
    );
    let stderr = String::from_utf8_lossy(&out.stderr);

    assert!(!out.status.success());
    assert_eq!(stderr.matches("nonexistent_input").count(), 1, "{stderr}");
    assert!(!stderr.contains("Caused by"), "{stderr}");
    // The engine check only runs once the input has been validated.
    assert!(!stderr.to_lowercase().contains("weasyprint"), "{stderr}");
    assert!(!output.exists());
}
