//! Runs the `kway-merge` binary end to end

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const ENV_VARS: [&str; 4] = [
    "KWAY_MERGE_INPUT_DIR",
    "KWAY_MERGE_OUTPUT",
    "KWAY_MERGE_PROGRESS_INTERVAL",
    "KWAY_MERGE_LOG",
];

fn run(cwd: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kway-merge"));
    cmd.current_dir(cwd).args(args);
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.output().expect("failed to launch kway-merge")
}

fn write_sources(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("a.txt"), "1 4 9\n").unwrap();
    fs::write(dir.join("b.txt"), "-2 4 5\n").unwrap();
}

#[test]
fn test_no_subcommand_merges_with_defaults() {
    let work = tempfile::tempdir().unwrap();
    write_sources(&work.path().join(kway_merge::config::DEFAULT_INPUT_DIR));

    let out = run(work.path(), &[]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let merged = work.path().join(kway_merge::config::DEFAULT_OUTPUT);
    assert_eq!(fs::read_to_string(merged).unwrap(), "-2\n1\n4\n4\n5\n9\n");
}

#[test]
fn test_top_level_flags_apply_without_subcommand() {
    let work = tempfile::tempdir().unwrap();
    write_sources(&work.path().join("inputs"));

    let out = run(work.path(), &["--input-dir", "inputs", "--output", "out.txt"]);

    assert!(out.status.success());
    assert_eq!(
        fs::read_to_string(work.path().join("out.txt")).unwrap(),
        "-2\n1\n4\n4\n5\n9\n"
    );
}

#[test]
fn test_merge_subcommand_writes_report() {
    let work = tempfile::tempdir().unwrap();
    write_sources(&work.path().join("inputs"));

    let out = run(
        work.path(),
        &["merge", "--input-dir", "inputs", "-o", "out.txt", "--report", "report.json"],
    );

    assert!(out.status.success());
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(work.path().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(report["values_written"], 6);
}

#[test]
fn test_sink_open_failure_exits_nonzero() {
    let work = tempfile::tempdir().unwrap();
    write_sources(&work.path().join("inputs"));
    let output = work.path().join("missing").join("out.txt");

    let out = run(
        work.path(),
        &["merge", "--input-dir", "inputs", "--output", output.to_str().unwrap()],
    );

    assert!(!out.status.success());
    assert!(!output.exists());
    assert!(!String::from_utf8_lossy(&out.stderr).is_empty());
}

#[test]
fn test_missing_input_dir_exits_nonzero() {
    let work = tempfile::tempdir().unwrap();

    let out = run(work.path(), &["--input-dir", "nowhere"]);

    assert!(!out.status.success());
    assert!(!work.path().join(kway_merge::config::DEFAULT_OUTPUT).exists());
}

#[test]
fn test_verify_rejects_unsorted_file() {
    let work = tempfile::tempdir().unwrap();
    fs::write(work.path().join("merged.txt"), "1\n3\n2\n").unwrap();

    let sorted = work.path().join("sorted.txt");
    fs::write(&sorted, "1\n2\n3\n").unwrap();

    assert!(!run(work.path(), &["verify", "merged.txt"]).status.success());
    assert!(run(work.path(), &["verify", "sorted.txt"]).status.success());
}
