use std::io::Write;
use std::process::{Command, Output};

fn numguard(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_numguard"))
        .args(args)
        .output()
        .expect("failed to run numguard")
}

fn combined(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn matrix_file(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_alloc_succeeds() {
    let output = numguard(&["alloc", "--rows", "3", "--cols", "3"]);
    assert_eq!(output.status.code(), Some(0), "{}", combined(&output));
}

#[test]
fn test_unsatisfiable_alloc_exits_1_naming_dimensions() {
    let output = numguard(&["alloc", "--rows", "3", "--cols", "3", "--limit", "4"]);
    assert_eq!(output.status.code(), Some(1));
    let text = combined(&output);
    assert!(text.contains("not enough memory to allocate a 3x3 matrix"), "{text}");
}

#[test]
fn test_indefinite_kernel_warns_then_fails_when_strict() {
    let file = matrix_file("[[1.0, 2.0], [2.0, 1.0]]");
    let path = file.path().to_str().unwrap();

    let output = numguard(&["validate-k", path]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("**** WARNING: K has small or negative eigenvalues"));

    let output = numguard(&["--strict", "validate-k", path]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("**** STRICT FAIL: K has small or negative eigenvalues"));

    let output = numguard(&["--strict", "--no-check", "validate-k", path]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_ragged_matrix_is_a_logic_failure() {
    let file = matrix_file("[[1.0, 2.0], [2.0]]");
    let output = numguard(&["validate-k", file.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("**** FAILED: "));
}

#[test]
fn test_options_merge_config_and_flags() {
    let config = matrix_file(r#"{ "quiet": true, "issue": 12 }"#);
    let output = numguard(&["--config", config.path().to_str().unwrap(), "--strict", "options"]);
    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["quiet"], true);
    assert_eq!(json["strict"], true);
    assert_eq!(json["issue"], 12);
    assert_eq!(json["debug"], false);
}

#[test]
fn test_silence_leaves_stderr_empty() {
    let file = matrix_file("[[1.0, 2.0], [2.0, 1.0]]");
    let output = numguard(&["--silence", "validate-k", file.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.trim().is_empty(), "{stderr}");
    assert!(String::from_utf8_lossy(&output.stdout).contains("K is valid"));
}

#[test]
fn test_each_warning_written_once() {
    let file = matrix_file("[[1.0, 2.0], [2.0, 1.0]]");
    let output = numguard(&["validate-k", file.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().filter(|line| !line.trim().is_empty()).collect();
    assert_eq!(lines.len(), 2, "{stderr}");
    assert!(lines[0].starts_with("**** WARNING: K has small or negative eigenvalues"));
    assert!(lines[1].starts_with("**** WARNING: K is not positive definite"));
    assert_eq!(stderr.matches("K has small or negative eigenvalues").count(), 1);
    assert_eq!(stderr.matches("K is not positive definite").count(), 1);
}

#[test]
fn test_silence_keeps_failures() {
    let output = numguard(&["--silence", "alloc", "--rows", "3", "--cols", "3", "--limit", "4"]);
    assert_eq!(output.status.code(), Some(1));
    let text = combined(&output);
    assert_eq!(text.matches("not enough memory to allocate a 3x3 matrix").count(), 1, "{text}");
}
