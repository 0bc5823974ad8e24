#![cfg(unix)]
//! autoprune end to end against a stub engine.

mod common;

use std::fs;
use std::path::PathBuf;

use common::{logged_lines, run_autodock, stderr_str, stdout_str, write_stub_engine};

fn rows(repo: &str) -> String {
    [
        format!("{repo}   2024-01-02T00-00-00Z   2222222222aa   1 day ago     119MB"),
        format!("{repo}   latest                 3333333333aa   2 hours ago   120MB"),
        format!("{repo}   2024-01-03T00-00-00Z   3333333333aa   2 hours ago   120MB"),
        format!("{repo}   2024-01-01T00-00-00Z   1111111111aa   2 days ago    118MB"),
        format!("{repo}   keepme                 1111111111aa   2 days ago    118MB"),
    ]
    .join("\n")
}

fn context_dir(base: &std::path::Path) -> PathBuf {
    let app = base.join("app");
    fs::create_dir(&app).expect("mkdir");
    app
}

#[test]
fn empty_inventory_reports_no_images_deleted() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let engine = write_stub_engine(dir.path());
    let log = dir.path().join("log");
    let app = context_dir(dir.path());

    let out = run_autodock(&engine, &log, &[], &["autoprune", app.to_str().expect("utf8")]);
    assert!(out.status.success());
    assert_eq!(stdout_str(&out).trim(), "no images deleted");
    let lines = logged_lines(&log);
    assert!(
        lines.iter().all(|l| !l.starts_with("image rm")),
        "no removal call may be issued: {lines:?}"
    );
}

#[test]
fn old_keeps_the_newest_timestamp_and_latest() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let engine = write_stub_engine(dir.path());
    let log = dir.path().join("log");
    let app = context_dir(dir.path());

    let out = run_autodock(
        &engine,
        &log,
        &[("AUTODOCK_TEST_ROWS", &rows("app"))],
        &["autoprune", app.to_str().expect("utf8"), "old"],
    );
    assert!(out.status.success(), "stderr: {}", stderr_str(&out));

    let lines = logged_lines(&log);
    let rm = lines
        .iter()
        .find(|l| l.starts_with("image rm"))
        .expect("one removal call");
    assert_eq!(
        rm,
        "image rm app:2024-01-01T00-00-00Z app:2024-01-02T00-00-00Z"
    );
}

#[test]
fn all_removes_every_auto_tag_in_one_bulk_call() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let engine = write_stub_engine(dir.path());
    let log = dir.path().join("log");
    let app = context_dir(dir.path());

    let out = run_autodock(
        &engine,
        &log,
        &[("AUTODOCK_TEST_ROWS", &rows("app"))],
        &["autoprune", app.to_str().expect("utf8"), "all"],
    );
    assert!(out.status.success());

    let lines = logged_lines(&log);
    let rm = lines
        .iter()
        .find(|l| l.starts_with("image rm"))
        .expect("one removal call");
    assert_eq!(
        rm,
        "image rm app:2024-01-01T00-00-00Z app:2024-01-02T00-00-00Z app:2024-01-03T00-00-00Z app:latest"
    );
    assert!(!rm.contains("keepme"), "user tags are never selected");
}

#[test]
fn unknown_method_is_rejected_before_any_engine_call() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let engine = write_stub_engine(dir.path());
    let log = dir.path().join("log");
    let app = context_dir(dir.path());

    let out = run_autodock(
        &engine,
        &log,
        &[],
        &["autoprune", app.to_str().expect("utf8"), "xyz"],
    );
    assert_eq!(out.status.code(), Some(2));
    let err = stderr_str(&out);
    assert!(err.contains("unknown selection method"));
    assert!(err.contains("xyz"));
    assert!(err.contains("Usage: autodock autoprune PATH [all|old]"));
    assert!(logged_lines(&log).is_empty());
}
