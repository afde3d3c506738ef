//! Integration tests for the `runlet` binary

use assert_cmd::Command;
use tempfile::TempDir;

fn runlet(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("runlet").unwrap();
    cmd.arg("--out-dir").arg(dir.path());
    cmd
}

#[test]
fn test_exec_prints_output() {
    let tmp = TempDir::new().unwrap();
    let output = runlet(&tmp)
        .arg("exec")
        .arg("--import")
        .arg("use std::collections::*;")
        .arg("let mut l = Vec::new(); l.push(5); println!(\"{}\", l[0]);")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "5\n");
}

#[test]
fn test_exec_routes_use_statements() {
    let tmp = TempDir::new().unwrap();
    let output = runlet(&tmp)
        .arg("exec")
        .arg("let mut s = BTreeSet::new(); s.insert(3); s.insert(1);")
        .arg("use std::collections::BTreeSet;")
        .arg("println!(\"{:?}\", s);")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "{1, 3}\n");
}

#[test]
fn test_exec_rejects_return() {
    let tmp = TempDir::new().unwrap();
    let output = runlet(&tmp).arg("exec").arg("return 5;").output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No return statements allowed."));
    assert!(!tmp.path().join("runner.rs").exists());
}

#[test]
fn test_exec_reports_compile_error() {
    let tmp = TempDir::new().unwrap();
    let output = runlet(&tmp).arg("exec").arg("let x = ;").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"));
    assert!(tmp.path().join("runner.rs").exists());
    assert!(tmp.path().join("error.log").exists());
}

#[test]
fn test_exec_panic_still_succeeds() {
    let tmp = TempDir::new().unwrap();
    let output = runlet(&tmp)
        .arg("exec")
        .arg("println!(\"before\");")
        .arg("let v: Vec<i32> = Vec::new(); println!(\"{}\", v[\"3\".parse::<usize>().unwrap()]);")
        .arg("println!(\"after\");")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("before"));
    assert!(!stdout.contains("after"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("panicked"));
    assert!(stderr.contains("stack backtrace:"));
}

#[test]
fn test_exec_requires_output_dir() {
    let config_home = TempDir::new().unwrap();
    let output = Command::cargo_bin("runlet")
        .unwrap()
        .env("XDG_CONFIG_HOME", config_home.path())
        .arg("exec")
        .arg("let a = 1;")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No output directory"));
}

#[test]
fn test_invalid_output_dir() {
    let tmp = TempDir::new().unwrap();
    let output = Command::cargo_bin("runlet")
        .unwrap()
        .arg("--out-dir")
        .arg(tmp.path().join("missing"))
        .arg("exec")
        .arg("let a = 1;")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_demo() {
    let tmp = TempDir::new().unwrap();
    let output = runlet(&tmp).arg("demo").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("10\ni is less than 100\n0\n1\n2\n3\n4\n"));
}

#[test]
fn test_version() {
    let output = Command::cargo_bin("runlet")
        .unwrap()
        .arg("version")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Runlet "));
}
