use std::path::Path;
use std::process::{Command, Output};

use cid_rs::{legacy, SuffixArray};
use tempfile::tempdir;

fn lz_cid(args: &[&str], input: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lz-cid"))
        .args(args)
        .arg(input)
        .output()
        .unwrap()
}

#[test]
fn test_tab_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("distinct.bin");
    std::fs::write(&input, (0u8..10).collect::<Vec<_>>()).unwrap();

    let out = lz_cid(&["-t"], &input);
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "10\t10\t1\n");
}

#[test]
fn test_plain_output_is_cid() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("periodic.bin");
    std::fs::write(&input, b"AB".repeat(50)).unwrap();

    let out = lz_cid(&[], &input);
    assert!(out.status.success());
    let cid: f64 = String::from_utf8(out.stdout).unwrap().trim().parse().unwrap();
    assert!(cid > 0.0 && cid < 0.15);
}

#[test]
fn test_strategies_print_same_stats() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("text.bin");
    std::fs::write(&input, b"abracadabra abracadabra cadabra").unwrap();

    let reference = lz_cid(&["-t", "--strategy", "reference"], &input);
    let accelerated = lz_cid(&["-t", "--strategy", "accelerated"], &input);
    assert_eq!(reference.stdout, accelerated.stdout);
}

#[test]
fn test_json_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("run.bin");
    std::fs::write(&input, vec![b'A'; 10]).unwrap();

    let out = lz_cid(&["--json", "--overlap"], &input);
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["stats"]["factors"], 2);
    assert!(value["baseline"].is_null());
}

#[test]
fn test_empty_input_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty.bin");
    std::fs::write(&input, b"").unwrap();

    let out = lz_cid(&["-t"], &input);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("Error: invalid input"));
}

#[test]
fn test_missing_file_fails() {
    let dir = tempdir().unwrap();
    let out = lz_cid(&[], &dir.path().join("absent.bin"));
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_unknown_option_exits_one() {
    let dir = tempdir().unwrap();
    let out = lz_cid(&["--bogus"], &dir.path().join("x"));
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_log_level_is_validated() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("distinct.bin");
    std::fs::write(&input, (0u8..10).collect::<Vec<_>>()).unwrap();

    let out = lz_cid(&["--log-level", "verbose", "-t"], &input);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());

    let out = lz_cid(&["--log-level", "info", "-t"], &input);
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "10\t10\t1\n");
}

#[test]
fn test_help_exits_zero() {
    let out = Command::new(env!("CARGO_BIN_EXE_lz-cid"))
        .arg("--help")
        .output()
        .unwrap();
    assert!(out.status.success());
}

#[test]
fn test_legacy_short_suffix_array() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("seq.txt");
    std::fs::write(&input, b"ABABABAB\n").unwrap();
    let sa = SuffixArray::build(b"ABABABAB").unwrap();
    let sa_path = legacy::suffix_array_path(&input);
    legacy::write_suffix_array(&sa_path, &sa).unwrap();

    let ok = lz_cid(&["--legacy", "-t"], &input);
    assert!(ok.status.success());

    let mut bytes = std::fs::read(&sa_path).unwrap();
    bytes.pop();
    std::fs::write(&sa_path, bytes).unwrap();

    let out = lz_cid(&["--legacy"], &input);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("read 31"));
}

#[test]
fn test_shuffled_baseline_columns() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("crystal.bin");
    std::fs::write(&input, b"AABBCC".repeat(30)).unwrap();

    let out = lz_cid(&["-t", "--shuffles", "3", "--seed", "9"], &input);
    assert!(out.status.success());
    let line = String::from_utf8(out.stdout).unwrap();
    let cols: Vec<&str> = line.trim().split('\t').collect();
    assert_eq!(cols.len(), 5);
    let normalized: f64 = cols[4].parse().unwrap();
    assert!(normalized < 1.0);
}
