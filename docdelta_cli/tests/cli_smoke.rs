use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(prefix: &str, ext: &str) -> PathBuf {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("docdelta-{prefix}-{nonce}{ext}"))
}

fn write_pair(prefix: &str, original: &str, modified: &str) -> (PathBuf, PathBuf) {
    let left = temp_path(&format!("{prefix}-original"), ".html");
    let right = temp_path(&format!("{prefix}-modified"), ".html");
    fs::write(&left, original).expect("write original");
    fs::write(&right, modified).expect("write modified");
    (left, right)
}

#[test]
fn doc_diff_prints_markdown_report() {
    let (left, right) = write_pair("markdown", "<p>Hello world</p>", "<p>Hello brave world</p>");

    let output = Command::new(env!("CARGO_BIN_EXE_doc-diff"))
        .arg(&left)
        .arg(&right)
        .output()
        .expect("run doc-diff");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Document Diff Report"));
    assert!(stdout.contains("Inserted tokens: 2"));
    assert!(stdout.contains("`diff-1` Inserted \"brave \""));
}

#[test]
fn doc_diff_emits_json() {
    let (left, right) = write_pair("json", "<p>A B C</p>", "<p>A X C</p>");

    let output = Command::new(env!("CARGO_BIN_EXE_doc-diff"))
        .arg("--json")
        .arg("--no-inline-view")
        .arg(&left)
        .arg(&right)
        .output()
        .expect("run doc-diff --json");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["hasChanges"], true);
    assert_eq!(json["stats"]["replacedTokens"], 1);
    assert_eq!(json["diffItems"][0]["type"], "replace");
    assert!(json.get("diffHtml").is_none());
}

#[test]
fn doc_diff_writes_highlighted_documents() {
    let (left, right) = write_pair("outdir", "<p>one two</p>", "<p>one three</p>");
    let out_dir = temp_path("out", "");

    let output = Command::new(env!("CARGO_BIN_EXE_doc-diff"))
        .arg("--marker-tag")
        .arg("mark")
        .arg("--out-dir")
        .arg(&out_dir)
        .arg(&left)
        .arg(&right)
        .output()
        .expect("run doc-diff --out-dir");
    assert!(output.status.success());

    let original = fs::read_to_string(out_dir.join("original.html")).expect("original output");
    let modified = fs::read_to_string(out_dir.join("modified.html")).expect("modified output");
    assert!(original.starts_with("<p>one <mark class=\"diff-mark diff-replace\""));
    assert!(modified.ends_with(">three</mark></p>"));
}

#[test]
fn doc_diff_fails_on_missing_input() {
    let output = Command::new(env!("CARGO_BIN_EXE_doc-diff"))
        .arg(temp_path("missing", ".html"))
        .arg(temp_path("missing-too", ".html"))
        .output()
        .expect("run doc-diff");
    assert!(!output.status.success());
}

#[test]
fn replay_fixtures_passes() {
    let output = Command::new(env!("CARGO_BIN_EXE_docdelta-replay-fixtures"))
        .output()
        .expect("run docdelta-replay-fixtures");

    assert!(
        output.status.success(),
        "replay failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("replayed 6 fixture(s)"));
}
