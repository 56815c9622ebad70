//! CLI subprocess integration tests.
//!
//! These tests invoke the `sapic-ci` binary as a subprocess and verify
//! exit codes, stdout content, and JSON output stability.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::process::Command;

fn sapic_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sapic-ci"));
    // Keep runs hermetic regardless of the invoking CI environment
    cmd.env_remove("REGISTRY_URL");
    cmd.env_remove("SAPIC_REGISTRY_TOKEN");
    cmd
}

fn write_extension(dir: &std::path::Path, version: &str) {
    std::fs::write(
        dir.join("Sapic.json"),
        format!(
            r#"{{
    "identifier": "dev.sapic.cli-test",
    "name": "CliTest",
    "version": "{version}",
    "minAppVersion": "0.9.0",
    "authors": ["Ada"],
    "description": "integration fixture",
    "repository": "https://example.com/cli-test",
    "contributes": {{"commands": "cmd"}}
}}"#
        ),
    )
    .unwrap();
    std::fs::create_dir_all(dir.join("cmd")).unwrap();
    std::fs::write(dir.join("cmd/a.txt"), "hello").unwrap();
}

/// Answer every request with the given status; returns the base URL.
fn spawn_registry(status: u16, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).is_err() || line.trim().is_empty() {
                    break;
                }
                if let Some(val) = line.to_lowercase().strip_prefix("content-length: ") {
                    content_length = val.trim().parse().unwrap_or(0);
                }
            }
            let mut drain = vec![0u8; content_length];
            if content_length > 0 {
                let _ = reader.read_exact(&mut drain);
            }
            let response = format!(
                "HTTP/1.1 {status} Status\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });
    addr
}

#[test]
fn cli_version_exits_zero() {
    let output = sapic_bin().arg("--version").output().unwrap();
    assert!(output.status.success(), "sapic-ci --version must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("sapic-ci"),
        "version output must contain 'sapic-ci': {stdout}"
    );
}

#[test]
fn cli_help_lists_subcommands() {
    let output = sapic_bin().arg("--help").output().unwrap();
    assert!(output.status.success(), "sapic-ci --help must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["publish", "build", "validate", "changed"] {
        assert!(
            stdout.contains(subcommand),
            "help must list '{subcommand}' command"
        );
    }
}

#[test]
fn validate_accepts_well_formed_extension() {
    let ext = tempfile::tempdir().unwrap();
    write_extension(ext.path(), "1.2.3");

    let output = sapic_bin()
        .args(["validate", &ext.path().to_string_lossy()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("dev.sapic.cli-test"));
}

#[test]
fn validate_rejects_leading_zero_version_with_exit_code_2() {
    let ext = tempfile::tempdir().unwrap();
    write_extension(ext.path(), "01.2.3");

    let output = sapic_bin()
        .args(["validate", &ext.path().to_string_lossy()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("version error"), "stderr: {stderr}");
    assert!(stderr.contains("01.2.3"), "stderr: {stderr}");
}

#[test]
fn validate_missing_manifest_exits_2() {
    let ext = tempfile::tempdir().unwrap();
    let output = sapic_bin()
        .args(["validate", &ext.path().to_string_lossy()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("manifest"), "stderr: {stderr}");
}

#[test]
fn build_writes_artifact_named_after_extension_directory() {
    let parent = tempfile::tempdir().unwrap();
    let ext = parent.path().join("hello-ext");
    std::fs::create_dir(&ext).unwrap();
    write_extension(&ext, "1.0.0");
    let out = tempfile::tempdir().unwrap();

    let output = sapic_bin()
        .args([
            "build",
            &ext.to_string_lossy(),
            "--output-dir",
            &out.path().to_string_lossy(),
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(out.path().join("hello-ext.tar.gz").exists());
}

#[test]
fn build_json_output_is_parseable() {
    let ext = tempfile::tempdir().unwrap();
    write_extension(ext.path(), "1.0.0");
    let out = tempfile::tempdir().unwrap();

    let output = sapic_bin()
        .args([
            "build",
            &ext.path().to_string_lossy(),
            "--output-dir",
            &out.path().to_string_lossy(),
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout must be JSON");
    assert_eq!(payload["identifier"], "dev.sapic.cli-test");
    assert_eq!(payload["version"], "1.0.0");
}

#[test]
fn build_missing_contribution_exits_3() {
    let ext = tempfile::tempdir().unwrap();
    write_extension(ext.path(), "1.0.0");
    std::fs::remove_dir_all(ext.path().join("cmd")).unwrap();
    let out = tempfile::tempdir().unwrap();

    let output = sapic_bin()
        .args([
            "build",
            &ext.path().to_string_lossy(),
            "--output-dir",
            &out.path().to_string_lossy(),
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cmd"), "stderr: {stderr}");
}

#[test]
fn publish_without_registry_config_exits_1() {
    let ext = tempfile::tempdir().unwrap();
    write_extension(ext.path(), "1.0.0");

    let output = sapic_bin()
        .args(["publish", &ext.path().to_string_lossy()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no registry configured"), "stderr: {stderr}");
}

#[test]
fn publish_to_accepting_registry_succeeds() {
    let ext = tempfile::tempdir().unwrap();
    write_extension(ext.path(), "1.2.3");
    let out = tempfile::tempdir().unwrap();
    let registry = spawn_registry(201, "");

    let output = sapic_bin()
        .args([
            "publish",
            &ext.path().to_string_lossy(),
            "--registry",
            &registry,
            "--output-dir",
            &out.path().to_string_lossy(),
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("published dev.sapic.cli-test@1.2.3"));
}

#[test]
fn publish_rejected_by_registry_exits_4() {
    let ext = tempfile::tempdir().unwrap();
    write_extension(ext.path(), "1.2.3");
    let out = tempfile::tempdir().unwrap();
    let registry = spawn_registry(500, r#"{"error":"storage unavailable"}"#);

    let output = sapic_bin()
        .args([
            "publish",
            &ext.path().to_string_lossy(),
            "--registry",
            &registry,
            "--output-dir",
            &out.path().to_string_lossy(),
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("500"), "stderr: {stderr}");
    assert!(stderr.contains("storage unavailable"), "stderr: {stderr}");
}
