use rusqlite::Connection;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const EVENTS: &str = "\
tables: [events]
events:
  name: text
  count: integer
";

fn mlogr_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mlogr"))
}

fn run_cli(dir: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(mlogr_bin())
        .args(args)
        .current_dir(dir)
        .env("MLOGR_HOME", dir.join("home"))
        .env("RUST_LOG", "error")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to execute mlogr CLI");

    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for mlogr CLI")
}

fn assert_cli_success(output: &Output, args: &[&str]) {
    assert!(
        output.status.success(),
        "command failed: {:?}\nstdout:\n{}\nstderr:\n{}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn write_config(dir: &Path, contents: &str) {
    std::fs::write(dir.join("mlogr.conf"), contents).expect("write config");
}

#[test]
fn test_entry_is_written_with_defaults() {
    let tmp = TempDir::new().expect("create temp dir");
    write_config(tmp.path(), EVENTS);

    let output = run_cli(tmp.path(), &[], "launch\nabc\n3\n\n");
    assert_cli_success(&output, &[]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Bad response 'abc'"), "stderr:\n{}", stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Reading configuration from mlogr.conf..."));
    assert!(stdout.contains("Connecting to database mlogr.db..."));
    assert!(stdout.contains("Done!"));

    let conn = Connection::open(tmp.path().join("mlogr.db")).expect("open sqlite db");
    let (id, name, count): (i64, String, i64) = conn
        .query_row("SELECT id, name, count FROM events", [], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })
        .expect("row written");
    assert_eq!((id, name.as_str(), count), (1, "launch", 3));
}

#[test]
fn test_second_run_appends_to_existing_tables() {
    let tmp = TempDir::new().expect("create temp dir");
    write_config(tmp.path(), EVENTS);

    let first = run_cli(tmp.path(), &[], "launch\n1\n\n");
    assert_cli_success(&first, &[]);
    let second = run_cli(tmp.path(), &[], "landing\n2\n\n");
    assert_cli_success(&second, &[]);

    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(stdout.contains("Log table 'events' exists..."), "stdout:\n{}", stdout);

    let conn = Connection::open(tmp.path().join("mlogr.db")).expect("open sqlite db");
    let rows: Vec<(i64, String, i64)> = conn
        .prepare("SELECT id, name, count FROM events ORDER BY id")
        .expect("prepare select")
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .expect("query rows")
        .collect::<Result<_, _>>()
        .expect("read rows");
    assert_eq!(
        rows,
        vec![(1, "launch".to_string(), 1), (2, "landing".to_string(), 2)]
    );
}

#[test]
fn test_custom_config_and_database_paths() {
    let tmp = TempDir::new().expect("create temp dir");
    std::fs::write(tmp.path().join("meals.yaml"), "tables: [meals]\nmeals:\n  dish: text\n")
        .expect("write config");

    let args = ["-c", "meals.yaml", "--file", "data/food.db"];
    let output = run_cli(tmp.path(), &args, "soup\n\n");
    assert_cli_success(&output, &args);

    let conn = Connection::open(tmp.path().join("data/food.db")).expect("open sqlite db");
    let dish: String = conn
        .query_row("SELECT dish FROM meals", [], |row| row.get(0))
        .expect("row written");
    assert_eq!(dish, "soup");
}

#[test]
fn test_print_config_exits_before_opening_database() {
    let tmp = TempDir::new().expect("create temp dir");
    write_config(tmp.path(), EVENTS);

    let output = run_cli(tmp.path(), &["-p"], "");
    assert_cli_success(&output, &["-p"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("- events"));
    assert!(stdout.contains("name: text"));
    assert!(!tmp.path().join("mlogr.db").exists());
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().expect("create temp dir");

    let output = run_cli(tmp.path(), &["--config-file", "nope.conf"], "");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: Config file not found: nope.conf"));
    assert!(!tmp.path().join("mlogr.db").exists());
}

#[test]
fn test_invalid_config_fails() {
    let tmp = TempDir::new().expect("create temp dir");
    write_config(tmp.path(), "tables: [events]\nevents:\n  when: date\n");

    let output = run_cli(tmp.path(), &[], "");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Column 'when' has bad type definition 'date'"));
}

#[test]
fn test_unknown_flag_is_usage_error() {
    let tmp = TempDir::new().expect("create temp dir");

    let output = run_cli(tmp.path(), &["--bogus"], "");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"));
}

#[test]
fn test_help_exits_successfully() {
    let tmp = TempDir::new().expect("create temp dir");

    let output = run_cli(tmp.path(), &["--help"], "");
    assert_cli_success(&output, &["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--config-file"));
    assert!(stdout.contains("--print-config"));
}

#[test]
fn test_closed_stdin_writes_nothing() {
    let tmp = TempDir::new().expect("create temp dir");
    write_config(tmp.path(), EVENTS);

    let output = run_cli(tmp.path(), &[], "launch\n");
    assert_eq!(output.status.code(), Some(1));

    let conn = Connection::open(tmp.path().join("mlogr.db")).expect("open sqlite db");
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
        .expect("count rows");
    assert_eq!(rows, 0);
}

#[cfg(unix)]
#[test]
fn test_post_hook_failure_keeps_success_status() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().expect("create temp dir");
    write_config(tmp.path(), EVENTS);
    let hooks = tmp.path().join("hooks");
    std::fs::create_dir_all(&hooks).expect("create hooks dir");
    let hook = hooks.join("post-hook");
    std::fs::write(&hook, "#!/bin/sh\ntouch hook-ran\nexit 1\n").expect("write hook");
    std::fs::set_permissions(&hook, std::fs::Permissions::from_mode(0o755)).expect("chmod hook");

    let output = run_cli(tmp.path(), &[], "launch\n3\n\n");
    assert_cli_success(&output, &[]);

    assert!(tmp.path().join("hook-ran").exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Running post-hook..."));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error while running post-hook"));
}
