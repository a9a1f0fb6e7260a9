//! Runs the `qgate` binary against throwaway projects.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn qgate(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qgate"))
        .args(args)
        .current_dir(dir)
        .env("QGATE_CONFIG_DIR", dir.join("no-global"))
        .env_remove("QGATE_CONFIG")
        .output()
        .expect("qgate runs")
}

const CLEAN: &str = r"public final class Clean {
    private final int size;

    public Clean(int size) {
        this.size = size;
    }

    public int size() {
        return size;
    }
}
";

const OUT_OF_ORDER: &str = r"public final class Messy {
    private int count;

    private void helper() {
        count++;
    }

    public Messy() {
        helper();
    }
}
";

#[test]
fn clean_project_exits_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("Clean.java"), CLEAN).expect("write");

    let output = qgate(dir.path(), &["check", "."]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0 error(s)"), "{stdout}");
}

#[test]
fn violations_fail_the_gate() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("Messy.java"), OUT_OF_ORDER).expect("write");

    let output = qgate(dir.path(), &["check", ".", "--format", "compact"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Messy.java:8:"), "{stdout}");
    assert!(stdout.contains("[QG001]"), "{stdout}");
}

#[test]
fn json_report_lists_violations() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("Messy.java"), OUT_OF_ORDER).expect("write");
    fs::write(dir.path().join("Clean.java"), CLEAN).expect("write");

    let output = qgate(dir.path(), &["check", ".", "--format", "json"]);
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is json");
    assert_eq!(json["passed"], false);
    assert_eq!(json["files_checked"], 2);
    assert_eq!(json["violations"][0]["code"], "QG001");
    assert_eq!(json["violations"][0]["rule"], "declaration-order");
}

#[test]
fn project_config_disables_rule() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("Messy.java"), OUT_OF_ORDER).expect("write");
    fs::write(
        dir.path().join("qgate.toml"),
        "[rules.declaration-order]\nenabled = false\n",
    )
    .expect("write");

    let output = qgate(dir.path(), &["check", "."]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn rules_filter_restricts_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("Messy.java"), OUT_OF_ORDER).expect("write");

    let output = qgate(dir.path(), &["check", ".", "--rules", "record-shape"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn unknown_rule_in_config_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("Clean.java"), CLEAN).expect("write");
    fs::write(dir.path().join("qgate.toml"), "[rules.no-such-rule]\n").expect("write");

    let output = qgate(dir.path(), &["check", "."]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no-such-rule"), "{stderr}");
}

#[test]
fn init_writes_config_once() {
    let dir = tempfile::tempdir().expect("tempdir");

    let first = qgate(dir.path(), &["init"]);
    assert!(first.status.success());
    assert!(dir.path().join("qgate.toml").is_file());

    let second = qgate(dir.path(), &["init"]);
    assert!(!second.status.success());

    let forced = qgate(dir.path(), &["init", "--force"]);
    assert!(forced.status.success());
}

#[test]
fn list_rules_shows_every_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = qgate(dir.path(), &["list-rules"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for code in ["QG001", "QG002", "QG003", "QG004", "QG005", "QG006", "QG007", "QG008"] {
        assert!(stdout.contains(code), "missing {code}");
    }
}
