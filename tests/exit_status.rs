#![cfg(unix)]

extern crate tempfile;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn batch_cmp_rsem(dir: &Path, manifest: &str, extra: &[&str]) -> Output {
    let input = dir.join("manifest.txt");
    fs::write(&input, manifest).unwrap();
    Command::new(env!("CARGO_BIN_EXE_batch-cmp-rsem"))
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.join("out"))
        .args(extra)
        .output()
        .unwrap()
}

const TWO_ROWS: &str = "#sample\tcontrol\tgene\ns1\tc1\tGENE1\ns2\tc2\tGENE2\n";

#[test]
fn row_failures_exit_zero() {
    let tmp = TempDir::new().unwrap();
    let out = batch_cmp_rsem(tmp.path(), TWO_ROWS, &["-t", "sh -c false"]);

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.lines().all(|l| l.contains("failed with return code 1")));
    assert!(String::from_utf8_lossy(&out.stderr).contains("0 succeeded, 2 failed"));
}

#[test]
fn fail_on_error_exits_one() {
    let tmp = TempDir::new().unwrap();
    let out = batch_cmp_rsem(tmp.path(), TWO_ROWS, &["-t", "sh -c false", "--fail-on-error"]);
    assert_eq!(out.status.code(), Some(1));

    let tmp = TempDir::new().unwrap();
    let out = batch_cmp_rsem(tmp.path(), TWO_ROWS, &["-t", "sh -c true", "--fail-on-error"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
}

#[test]
fn malformed_row_with_fail_on_error_exits_one() {
    let tmp = TempDir::new().unwrap();
    let manifest = "#h\ns1\tc1\ns2\tc2\tGENE2\n";

    let out = batch_cmp_rsem(tmp.path(), manifest, &["-t", "sh -c true"]);
    assert_eq!(out.status.code(), Some(0));

    let out = batch_cmp_rsem(tmp.path(), manifest, &["-t", "sh -c true", "--fail-on-error"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn setup_errors_exit_one() {
    let tmp = TempDir::new().unwrap();
    let out = batch_cmp_rsem(tmp.path(), "s1\tc1\tGENE1\n", &["-t", "sh -c true"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("field-header line"));

    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("manifest.txt");
    fs::write(&input, TWO_ROWS).unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_batch-cmp-rsem"))
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(tmp.path().join("a").join("b"))
        .args(&["-t", "sh -c true"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(!tmp.path().join("a").exists());
}
