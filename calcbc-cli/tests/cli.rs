use std::process::{Command, Output};

fn calcbc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_calcbc"))
        .args(args)
        .env_remove("GROQ_API_KEY")
        .output()
        .expect("failed to run calcbc")
}

#[test]
fn test_units_lists_the_catalog() {
    let output = calcbc(&["units"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().filter(|l| l.starts_with("Unit ")).count(), 10);
    assert!(stdout.contains("The Chain Rule"));
}

#[test]
fn test_quiz_rejects_descending_range_before_contacting_groq() {
    let output = calcbc(&["quiz", "3-1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid unit selection '3-1'"));
}

#[test]
fn test_quiz_rejects_oversized_quiz() {
    let output = calcbc(&["quiz", "2", "--count", "31"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("between 1 and 30"));
}

#[test]
fn test_generate_without_api_key_fails_cleanly() {
    let output = calcbc(&["generate", "--kind", "frq", "--unit", "6"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Groq is not configured"));
}

#[test]
fn test_generate_rejects_unknown_kind() {
    let output = calcbc(&["generate", "--kind", "essay"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown question kind"));
}
