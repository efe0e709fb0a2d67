//! CLI integration tests: drive the compiled `simulator` binary directly
//! and check exit codes and the documented output-file contract.

use std::process::Command;

fn binary_path() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_simulator"))
}

#[test]
fn successful_run_writes_expected_file_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(binary_path())
        .args(["4", "3", "2"])
        .arg("--output-dir")
        .arg(dir.path())
        .arg("--seed")
        .arg("1")
        .output()
        .unwrap();

    assert!(output.status.success());
    let expected = dir.path().join("m4_n3_k2__1.gml");
    assert!(expected.exists(), "{:?} should exist", expected);

    let contents = std::fs::read_to_string(&expected).unwrap();
    assert!(contents.starts_with("graph"));
}

#[test]
fn multiple_runs_write_one_file_per_run() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(binary_path())
        .args(["4", "2", "2", "3"])
        .arg("--output-dir")
        .arg(dir.path())
        .arg("--seed")
        .arg("5")
        .output()
        .unwrap();

    assert!(output.status.success());
    for i in 1..=3 {
        let path = dir.path().join(format!("m4_n2_k2__{i}.gml"));
        assert!(path.exists(), "{:?} should exist", path);
    }
}

#[test]
fn zero_n_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(binary_path())
        .args(["4", "0", "2"])
        .arg("--output-dir")
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn missing_required_arguments_is_a_usage_error() {
    let output = Command::new(binary_path()).output().unwrap();
    assert!(!output.status.success());
}
