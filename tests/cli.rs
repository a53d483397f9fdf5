//! The `rsa64` binary: exit codes and what lands on stdout and stderr.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn rsa64(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rsa64"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// Parse "Public key: n e" style lines into their two numbers
fn key_numbers(line: &str, label: &str) -> (u64, u64) {
    let rest = line.strip_prefix(label).unwrap();
    let mut parts = rest.split_whitespace().map(|p| p.parse::<u64>().unwrap());
    (parts.next().unwrap(), parts.next().unwrap())
}

#[test]
fn test_no_arguments_is_usage_error() {
    let output = rsa64(&[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_non_numeric_key_is_usage_error() {
    let output = rsa64(&["-e", "abc", "17", "in.txt", "out.txt"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_keygen_prints_report() {
    let output = rsa64(&["-k"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);

    let (n_public, _e) = key_numbers(lines[0], "Public key: ");
    let (n_private, _d) = key_numbers(lines[1], "Private key: ");
    assert_eq!(n_public, n_private);
}

#[test]
fn test_missing_input_exits_with_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.txt");
    let cipher = dir.path().join("cipher.txt");

    let output = rsa64(&["-e", "3233", "17", path_arg(&missing), path_arg(&cipher)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("Error: "));
    assert!(stderr.contains("cannot open input file"));
    // The OS error appears once, at the end of the chain
    assert_eq!(stderr.matches("os error").count(), 1);
}

#[test]
fn test_encrypt_then_decrypt() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    let cipher = dir.path().join("cipher.txt");
    let restored = dir.path().join("restored.txt");
    fs::write(&plain, b"attack at dawn\n").unwrap();

    let keygen = rsa64(&["-k"]);
    let report = String::from_utf8(keygen.stdout).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    let (n, e) = key_numbers(lines[0], "Public key: ");
    let (_, d) = key_numbers(lines[1], "Private key: ");
    let (n, e, d) = (n.to_string(), e.to_string(), d.to_string());

    let output = rsa64(&["-e", &n, &e, path_arg(&plain), path_arg(&cipher)]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let output = rsa64(&["-d", &n, &d, path_arg(&cipher), path_arg(&restored)]);
    assert!(output.status.success());
    assert_eq!(fs::read(&restored).unwrap(), b"attack at dawn\n");
}

#[test]
fn test_strict_rejects_large_blocks() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    let cipher = dir.path().join("cipher.txt");
    fs::write(&plain, b"ABC").unwrap();

    let output = rsa64(&["--strict", "-e", "3233", "17", path_arg(&plain), path_arg(&cipher)]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("Error: "));
}
