//! Common utilities for CLI E2E tests.

#![allow(dead_code)]

use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// An isolated data directory for one test.
pub struct Cli {
    dir: TempDir,
}

impl Cli {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_flashdeck"));
        cmd.args(args)
            .env("FLASHDECK_DATA_DIR", self.dir.path())
            .env_remove("FLASHDECK_LOG")
            .env_remove("OPENAI_API_KEY")
            .env_remove("OPENAI_API_BASE_URL")
            .env_remove("MODEL_NAME");
        cmd
    }

    /// Invoke a CLI command and return (stdout, stderr, exit code).
    pub fn run(&self, args: &[&str]) -> (String, String, i32) {
        self.run_with_stdin(args, "")
    }

    pub fn run_with_stdin(&self, args: &[&str], stdin: &str) -> (String, String, i32) {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to execute CLI command");
        child
            .stdin
            .take()
            .expect("stdin piped")
            .write_all(stdin.as_bytes())
            .expect("Failed to write stdin");
        let output = child.wait_with_output().expect("Failed to wait for CLI");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        (stdout, stderr, code)
    }

    /// Invoke a CLI command and expect success.
    pub fn success(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "CLI command {args:?} failed: {stderr}");
        stdout
    }

    /// Invoke a CLI command and expect JSON output.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        parse_json(&self.success(args))
    }

    /// Invoke a CLI command and expect failure. Returns stderr.
    pub fn failure(&self, args: &[&str]) -> String {
        let (_, stderr, code) = self.run(args);
        assert!(code != 0, "CLI command unexpectedly succeeded: {args:?}");
        stderr
    }

    /// Sign in as a local account on `plan`.
    pub fn login(&self, user_id: &str, plan: &str) {
        self.success(&["auth", "login", user_id, "--plan", plan]);
    }

    /// Create a deck and return its id.
    pub fn create_deck(&self, title: &str) -> i64 {
        self.json(&["deck", "create", title])["id"]
            .as_i64()
            .expect("deck id")
    }
}

/// Parse JSON output from CLI.
pub fn parse_json(json: &str) -> serde_json::Value {
    serde_json::from_str(json).expect("Failed to parse JSON output")
}

/// Check if string contains substring
pub fn assert_contains(haystack: &str, needle: &str) {
    assert!(
        haystack.contains(needle),
        "Expected '{haystack}' to contain '{needle}'"
    );
}
