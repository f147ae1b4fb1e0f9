//! CLI behavior through the real binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn bin() -> Command {
    Command::cargo_bin("bashguard-bin").unwrap()
}

#[test]
fn clean_script_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("clean.sh");
    std::fs::write(&script, "PATH=/usr/bin:/bin\necho hello\n").unwrap();

    bin()
        .args(["analyze", "--no-shellcheck"])
        .arg(&script)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("No vulnerabilities found"));
}

#[test]
fn findings_exit_one_and_render_text() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("vuln.sh");
    std::fs::write(&script, "PATH=/usr/bin:/bin\nname=$1\neval $name\n").unwrap();

    bin()
        .args(["analyze", "--no-shellcheck"])
        .arg(&script)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Eval/Source Injection"))
        .stdout(predicate::str::contains("CRITICAL"))
        .stdout(predicate::str::contains("^---"));
}

#[test]
fn json_format_is_machine_readable() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("vuln.sh");
    std::fs::write(&script, "PATH=/usr/bin:/bin\nname=$1\neval $name\n").unwrap();

    let output = bin()
        .args(["analyze", "--no-shellcheck", "--format", "json"])
        .arg(&script)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["summary"]["total"].as_u64().unwrap() >= 2);
    assert!(value["vulnerabilities"].is_array());
}

#[test]
fn unsupported_format_is_rejected() {
    bin()
        .args(["analyze", "--no-shellcheck", "--format", "xml", "x.sh"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported output format"));
}

#[test]
fn fix_flag_writes_suffixed_sibling() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("quoteme.sh");
    std::fs::write(&script, "PATH=/usr/bin:/bin\nx=1\necho $x\n").unwrap();

    bin()
        .args(["analyze", "--no-shellcheck", "--fix"])
        .arg(&script)
        .assert()
        .code(1);

    let fixed = dir.path().join("quoteme_fixed.sh");
    assert_eq!(
        std::fs::read_to_string(&fixed).unwrap(),
        "PATH=/usr/bin:/bin\nx=1\necho \"$x\"\n"
    );
    // The original is untouched.
    assert_eq!(
        std::fs::read_to_string(&script).unwrap(),
        "PATH=/usr/bin:/bin\nx=1\necho $x\n"
    );
}

#[test]
fn directory_analysis_isolates_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("a.sh"),
        "PATH=/usr/bin:/bin\nname=$1\neval $name\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("b.sh"), "PATH=/usr/bin:/bin\necho hi\n").unwrap();

    bin()
        .args(["analyze", "--no-shellcheck"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("a.sh"));
}

#[test]
fn report_output_file_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("vuln.sh");
    std::fs::write(&script, "PATH=/usr/bin:/bin\nname=$1\neval $name\n").unwrap();
    let report = dir.path().join("report.html");

    bin()
        .args(["analyze", "--no-shellcheck", "--format", "html", "--output"])
        .arg(&report)
        .arg(&script)
        .assert()
        .code(1);

    let html = std::fs::read_to_string(&report).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("Eval/Source Injection"));
}
