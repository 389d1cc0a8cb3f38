use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Binary with an isolated settings file and no ambient credentials.
fn cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("textsummarizer").unwrap();
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_BASE_URL")
        .env_remove("TEXTSUMMARIZER_CONFIG")
        .env("RUST_LOG", "textsummarizer=info")
        .arg("--config")
        .arg(home.join("settings.json"));
    cmd
}

fn fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("tmp");
    let docs = dir.path().join("docs");
    fs::create_dir(&docs).unwrap();
    fs::write(docs.join("a.txt"), "A short note. It has two sentences.\n").unwrap();
    fs::write(docs.join("b.txt"), "Second file here. With more words after.\n").unwrap();
    fs::write(docs.join("skip.md"), "Markdown is not matched.\n").unwrap();
    dir
}

fn stdout_of(out: &std::process::Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr_of(out: &std::process::Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn summarizes_single_file_locally() {
    let dir = fixture();
    let out = cmd(dir.path())
        .args(["--no-ai", "summarize"])
        .arg(dir.path().join("docs/a.txt"))
        .args(["-l", "12"])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", stderr_of(&out));
    let stdout = stdout_of(&out);
    assert!(stdout.starts_with("Summary:\n"));
    assert!(stdout.contains(&"=".repeat(50)));
    assert!(stdout.contains("A short note.\n"));
    assert!(!stdout.contains("two sentences"));
}

#[test]
fn missing_credential_demotes_to_local_with_warning() {
    let dir = fixture();
    let out = cmd(dir.path())
        .args(["summarize", "-", "-l", "12"])
        .write_stdin("A short note. It has two sentences.")
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(stdout_of(&out).contains("A short note."));
    assert!(stderr_of(&out).contains("no API key available"));
}

#[test]
fn blank_stdin_gives_empty_summary() {
    let dir = fixture();
    let out = cmd(dir.path())
        .args(["--no-ai", "summarize", "-"])
        .write_stdin("   \n\t\n")
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(stdout_of(&out), format!("Summary:\n{}\n\n", "=".repeat(50)));
}

#[test]
fn missing_file_exits_with_input_error() {
    let dir = fixture();
    let out = cmd(dir.path())
        .args(["--no-ai", "summarize"])
        .arg(dir.path().join("docs/nope.txt"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(4));
    assert!(stderr_of(&out).contains("File not found"));
}

#[test]
fn batch_writes_markdown_report() {
    let dir = fixture();
    let report = dir.path().join("report.md");
    let out = cmd(dir.path())
        .args(["--no-ai", "batch"])
        .arg(dir.path().join("docs"))
        .arg("-o")
        .arg(&report)
        .args(["-l", "20"])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", stderr_of(&out));
    assert!(stdout_of(&out).contains("Results saved to:"));

    let md = fs::read_to_string(&report).unwrap();
    assert!(md.starts_with("# Batch Summarization Results\n\n"));
    let a = md.find("## a.txt").expect("a.txt entry");
    let b = md.find("## b.txt").expect("b.txt entry");
    assert!(a < b);
    assert!(md.contains("A short note.\n"));
    assert!(md.contains("Second file here.\n"));
    assert!(!md.contains("skip.md"));
    assert_eq!(md.matches("---\n").count(), 2);
}

#[test]
fn batch_on_missing_directory_fails_before_processing() {
    let dir = fixture();
    let report = dir.path().join("report.md");
    let out = cmd(dir.path())
        .args(["--no-ai", "batch"])
        .arg(dir.path().join("absent"))
        .arg("-o")
        .arg(&report)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr_of(&out).contains("Directory not found"));
    assert!(!report.exists());
}

#[test]
fn batch_with_no_matches_succeeds_with_empty_output() {
    let dir = fixture();
    let out = cmd(dir.path())
        .args(["--no-ai", "batch"])
        .arg(dir.path().join("docs"))
        .args(["-p", "*.rst"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(stdout_of(&out), "");
}

#[test]
fn file_list_isolates_failures_and_keeps_order() {
    let dir = fixture();
    let docs = dir.path().join("docs");
    let out = cmd(dir.path())
        .args(["--no-ai", "files"])
        .arg(docs.join("b.txt"))
        .arg(docs.join("missing.txt"))
        .arg(docs.join("a.txt"))
        .args(["-l", "20"])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", stderr_of(&out));
    let stdout = stdout_of(&out);
    let b = stdout.find("b.txt:").unwrap();
    let missing = stdout.find("missing.txt:").unwrap();
    let a = stdout.find("a.txt:").unwrap();
    assert!(b < missing && missing < a);
    assert_eq!(stdout.matches("Error: ").count(), 1);
    assert!(stdout.contains("Error: File not found"));
}

#[test]
fn config_set_persists_and_drives_defaults() {
    let dir = fixture();
    cmd(dir.path())
        .args(["config", "set", "default_length", "12"])
        .assert()
        .success();
    let out = cmd(dir.path()).args(["config", "show"]).output().unwrap();
    let shown: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(shown["default_length"], 12);
    assert_eq!(shown["model"], "gpt-3.5-turbo");

    let out = cmd(dir.path())
        .args(["--no-ai", "summarize"])
        .arg(dir.path().join("docs/a.txt"))
        .output()
        .unwrap();
    assert!(stdout_of(&out).contains("A short note.\n"));

    cmd(dir.path())
        .args(["config", "set", "colour", "red"])
        .assert()
        .failure();
}

#[cfg(unix)]
#[test]
fn interrupt_exits_distinctly_while_waiting_on_stdin() {
    use assert_cmd::prelude::*;
    use std::process::Stdio;
    use std::time::Duration;

    let dir = fixture();
    let mut child = std::process::Command::cargo_bin("textsummarizer")
        .unwrap()
        .env_remove("OPENAI_API_KEY")
        .arg("--config")
        .arg(dir.path().join("settings.json"))
        .args(["--no-ai", "summarize", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    // keep stdin open so the summarizer is blocked reading it
    let stdin = child.stdin.take().unwrap();

    // give the runtime time to install its Ctrl-C handler
    std::thread::sleep(Duration::from_millis(500));
    let status = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let out = child.wait_with_output().unwrap();
    drop(stdin);
    assert_eq!(out.status.code(), Some(130));
    let stderr = stderr_of(&out);
    assert!(stderr.contains("Interrupted"), "stderr: {stderr}");
    assert!(!stdout_of(&out).contains("Summary:"));
}
