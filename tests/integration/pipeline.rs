//! End-to-end tests of the session pipeline against the real rustc

use std::fs;
use std::path::Path;

use runlet::session::{
    RunOutcome, Session, SessionError, SourceAssembler, SOURCE_FILE, UNIT_NAME,
};
use runlet::toolchain::{CompilerDriver, EntryStatus, InvokeError, Loader, ERROR_LOG};
use runlet::util::config::ToolchainConfig;
use tempfile::TempDir;

/// Statement that writes `text` to `path`, so output can be checked in-process
fn write_statement(
    path: &Path,
    text: &str,
) -> String {
    format!(
        "::std::fs::write({:?}, {:?}).unwrap();",
        path.display().to_string(),
        text
    )
}

#[test]
fn test_successful_run() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out.txt");
    let mut session = Session::with_output_dir(tmp.path());

    session.add("use std::collections::*;").unwrap();
    session
        .add("let mut l = Vec::new(); l.push(5); let mut m = HashMap::new(); m.insert(1, l[0]);")
        .unwrap();
    session
        .add(format!(
            "::std::fs::write({:?}, m[&1].to_string()).unwrap();",
            out.display().to_string()
        ))
        .unwrap();

    let outcome = session.run_outcome().unwrap();
    assert_eq!(outcome, RunOutcome::Executed(EntryStatus::Completed));
    assert_eq!(fs::read_to_string(&out).unwrap(), "5");

    assert!(tmp.path().join(SOURCE_FILE).exists());
    assert!(tmp.path().join(ERROR_LOG).exists());
    assert!(Loader::new(tmp.path()).library_path(UNIT_NAME).exists());
    assert!(session.last_diagnostic().is_none());
}

#[test]
fn test_malformed_statement() {
    let tmp = TempDir::new().unwrap();
    let mut session = Session::with_output_dir(tmp.path());

    session.add("int x = ;").unwrap();
    session.add("let x = ;").unwrap();
    assert!(!session.run().unwrap());

    let summary = session.last_diagnostic().expect("a diagnostic");
    assert!(!summary.is_empty());
    assert!(summary.starts_with("error"));
    assert!(!summary.contains(SOURCE_FILE));

    assert!(tmp.path().join(SOURCE_FILE).exists());
    assert!(tmp.path().join(ERROR_LOG).exists());
    assert!(session.statements().is_empty());
    assert!(session.imports().is_empty());
}

#[test]
fn test_summary_drops_location_with_spaces() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("my out");
    fs::create_dir(&dir).unwrap();
    let mut session = Session::with_output_dir(&dir);

    session.add("let x = ;").unwrap();
    assert!(!session.run().unwrap());

    let summary = session.last_diagnostic().expect("a diagnostic");
    assert!(summary.starts_with("error"), "summary: {}", summary);
    assert!(!summary.contains("my out"));
    assert!(!summary.contains(SOURCE_FILE));
}

#[test]
fn test_nested_source_loads_from_reported_library_path() {
    let tmp = TempDir::new().unwrap();
    let driver = CompilerDriver::new(tmp.path(), ToolchainConfig::default());
    let unit = SourceAssembler::new().render();

    let source = driver
        .create_source_file(Path::new("nested").join(SOURCE_FILE), unit.source())
        .unwrap();
    let artifact = driver.compile(&source).unwrap();
    assert!(artifact.succeeded);
    assert!(artifact.library_path.starts_with(tmp.path().join("nested")));
    assert!(!Loader::new(tmp.path()).library_path(UNIT_NAME).exists());

    let loaded = Loader::load_path(&artifact.library_path, UNIT_NAME).unwrap();
    assert_eq!(loaded.invoke_entry().unwrap(), EntryStatus::Completed);
}

#[test]
fn test_compile_failure_outcome_points_at_log() {
    let tmp = TempDir::new().unwrap();
    let mut session = Session::with_output_dir(tmp.path());

    session.add("let y = undefined_name;").unwrap();
    match session.run_outcome().unwrap() {
        RunOutcome::CompileFailed { summary, log } => {
            assert!(summary.unwrap().contains("undefined_name"));
            assert_eq!(log, tmp.path().join(ERROR_LOG));
            assert!(fs::read_to_string(log).unwrap().contains("undefined_name"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_runtime_panic_is_contained() {
    let tmp = TempDir::new().unwrap();
    let mut session = Session::with_output_dir(tmp.path());

    session.add("let zero: i32 = \"0\".parse().unwrap();").unwrap();
    session.add("println!(\"{}\", 10 / zero);").unwrap();

    let outcome = session.run_outcome().unwrap();
    assert_eq!(outcome, RunOutcome::Executed(EntryStatus::Panicked));
    assert!(outcome.succeeded());
}

#[test]
fn test_panicking_run_reports_true() {
    let tmp = TempDir::new().unwrap();
    let mut session = Session::with_output_dir(tmp.path());

    session.add("panic!(\"boom\");").unwrap();
    assert!(session.run().unwrap());
}

#[test]
fn test_buffers_do_not_leak_into_next_run() {
    let tmp = TempDir::new().unwrap();
    let first = tmp.path().join("first.txt");
    let second = tmp.path().join("second.txt");
    let mut session = Session::with_output_dir(tmp.path());

    session.add(write_statement(&first, "one")).unwrap();
    assert!(session.run().unwrap());
    assert_eq!(fs::read_to_string(&first).unwrap(), "one");
    fs::remove_file(&first).unwrap();

    session.add(write_statement(&second, "two")).unwrap();
    assert!(!session.render_preview().source().contains("first.txt"));
    assert!(session.run().unwrap());

    // the reloaded unit is the new one, not the previously mapped library
    assert_eq!(fs::read_to_string(&second).unwrap(), "two");
    assert!(!first.exists());
}

#[test]
fn test_failed_compile_then_successful_run() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out.txt");
    let mut session = Session::with_output_dir(tmp.path());

    session.add("let x = ;").unwrap();
    assert!(!session.run().unwrap());
    assert!(session.last_diagnostic().is_some());

    session.add(write_statement(&out, "recovered")).unwrap();
    assert!(session.run().unwrap());
    assert!(session.last_diagnostic().is_none());
    assert_eq!(fs::read_to_string(&out).unwrap(), "recovered");
}

#[test]
fn test_return_is_rejected_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let mut session = Session::with_output_dir(tmp.path());

    let result = session.add("return 5;");
    assert!(matches!(result, Err(SessionError::InvalidStatement(_))));
    assert!(session.statements().is_empty());
    assert!(session.imports().is_empty());
    assert!(!tmp.path().join(SOURCE_FILE).exists());
}

#[test]
fn test_unknown_symbol_is_method_not_found() {
    let tmp = TempDir::new().unwrap();
    let mut session = Session::with_output_dir(tmp.path());
    assert!(session.run().unwrap());

    let unit = Loader::new(tmp.path()).load(UNIT_NAME).unwrap();
    let result = unit.invoke("no_such_entry");
    assert!(matches!(result, Err(InvokeError::MethodNotFound(_))));
    assert_eq!(unit.invoke_entry().unwrap(), EntryStatus::Completed);
}

#[test]
fn test_staging_file_is_removed_after_drop() {
    let tmp = TempDir::new().unwrap();
    let mut session = Session::with_output_dir(tmp.path());
    assert!(session.run().unwrap());

    let unit = Loader::new(tmp.path()).load(UNIT_NAME).unwrap();
    let staged = unit.staged_path().to_path_buf();
    assert!(staged.exists());
    drop(unit);
    assert!(!staged.exists());
}
