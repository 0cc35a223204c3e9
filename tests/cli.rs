//! Argument validation tests — no network I/O.
//!
//! Invalid arguments must be rejected before any cassette or live adapter is
//! consulted, so none of these need an API key.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("neongen");
    cmd.env("NEONGEN_CONFIG", "/nonexistent/neongen.toml")
        .env_remove("NEONGEN_REPLAY")
        .env_remove("NEONGEN_REC")
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY");
    cmd
}

#[test]
fn missing_prompt_exits_with_error() {
    cmd().assert().failure().stderr(predicate::str::contains("Provide a prompt string"));
}

#[test]
fn non_gemini_model_exits_with_error() {
    cmd()
        .args(["--model", "dall-e-3", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported model 'dall-e-3'"));
}

#[test]
fn invalid_aspect_ratio_exits_with_error() {
    cmd()
        .args(["--aspect-ratio", "21:9", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported aspect ratio '21:9'"));
}

#[test]
fn invalid_format_exits_with_error() {
    cmd()
        .args(["--format", "gif", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported format"));
}

#[test]
fn missing_api_key_exits_with_error() {
    cmd()
        .arg("a cat")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No Gemini API key"));
}

#[test]
fn bad_config_defaults_are_validated() {
    let path = std::env::temp_dir().join("neongen_cli_bad_defaults.toml");
    std::fs::write(&path, "[defaults]\naspect_ratio = \"2:1\"\n").unwrap();

    cmd()
        .env("NEONGEN_CONFIG", path.to_str().unwrap())
        .arg("a cat")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported aspect ratio '2:1'"));

    let _ = std::fs::remove_file(&path);
}
