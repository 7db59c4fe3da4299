//! CLI integration tests for the bountyboard command-line interface.
//!
//! These tests never reach a backend: they cover argument parsing, help
//! output and the commands that only touch local storage.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Isolated config and data directories for one test.
struct Sandbox {
    config: TempDir,
    data: TempDir,
    cwd: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            config: TempDir::new().unwrap(),
            data: TempDir::new().unwrap(),
            cwd: TempDir::new().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("bountyboard").unwrap();
        cmd.current_dir(self.cwd.path())
            .env("BOUNTYBOARD_CONFIG_DIR", self.config.path())
            .env_remove("BOUNTYBOARD_BACKEND_URL")
            .env_remove("BOUNTYBOARD_DATA_DIR")
            .env_remove("BOUNTYBOARD_PASSWORD")
            .arg("--data-dir")
            .arg(self.data.path());
        cmd
    }
}

/// Get a command for the bountyboard binary.
fn bountyboard() -> Command {
    Command::cargo_bin("bountyboard").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    bountyboard()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bountyboard"));
}

#[test]
fn test_version_displays() {
    bountyboard()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bountyboard"));
}

#[test]
fn test_help_lists_subcommands() {
    bountyboard()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("auth"))
        .stdout(predicate::str::contains("bookmarks"))
        .stdout(predicate::str::contains("winners"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_auth_help_lists_flows() {
    bountyboard()
        .args(["auth", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("totp"))
        .stdout(predicate::str::contains("whoami"));
}

#[test]
fn test_unknown_subcommand_rejected() {
    bountyboard().arg("frobnicate").assert().failure();
}

#[test]
fn test_backend_flag_accepted() {
    bountyboard()
        .args(["--backend", "http://localhost:9999", "--help"])
        .assert()
        .success();
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_auth_status_without_session() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not authenticated"));
}

#[test]
fn test_auth_status_reads_stored_session() {
    let sandbox = Sandbox::new();
    std::fs::write(
        sandbox.data.path().join("bountyboard-auth.json"),
        r#"{"state":{"accessToken":"acc-token-123456","refreshToken":"ref","user":{"id":"u1","name":"Ada"},"isAuthenticated":true},"version":0}"#,
    )
    .unwrap();

    sandbox
        .cmd()
        .args(["--json", "auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"isAuthenticated\": true"))
        .stdout(predicate::str::contains("Ada"));
}

#[test]
fn test_auth_logout_without_session() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No session found"));
}

#[test]
fn test_auth_logout_clears_stored_session() {
    let sandbox = Sandbox::new();
    let session_file = sandbox.data.path().join("bountyboard-auth.json");
    // No refresh token, so the backend is never contacted.
    std::fs::write(
        &session_file,
        r#"{"state":{"accessToken":"acc","refreshToken":"","user":null,"isAuthenticated":true},"version":0}"#,
    )
    .unwrap();

    sandbox
        .cmd()
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
    assert!(!session_file.exists());
}

// ─────────────────────────────────────────────────────────────────────────────
// Bookmark Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_bookmark_toggle_round_trip() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["bookmarks", "toggle", "bounty", "b1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Added to bookmarks"));

    sandbox
        .cmd()
        .args(["--json", "bookmarks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"b1\""))
        .stdout(predicate::str::contains("\"type\": \"bounty\""));

    sandbox
        .cmd()
        .args(["bookmarks", "toggle", "bounty", "b1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed from bookmarks"));

    sandbox
        .cmd()
        .args(["bookmarks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No bookmarks saved"));
}

#[test]
fn test_bookmark_toggle_rejects_unknown_kind() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["bookmarks", "toggle", "article", "a1"])
        .assert()
        .failure();
}

#[test]
fn test_bookmarks_clear() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["bookmarks", "toggle", "project", "p1"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["bookmarks", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 bookmark(s)"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Winner Draft Tests
// ─────────────────────────────────────────────────────────────────────────────

fn add_winner(sandbox: &Sandbox, position: &str, submission: &str, user: &str) {
    sandbox
        .cmd()
        .args([
            "winners",
            "bounty-1",
            "add",
            "--position",
            position,
            "--submission",
            submission,
            "--user",
            user,
            "--name",
            user,
            "--amount",
            "100",
        ])
        .assert()
        .success();
}

#[test]
fn test_winner_draft_persists_between_runs() {
    let sandbox = Sandbox::new();
    add_winner(&sandbox, "1", "s1", "u1");
    add_winner(&sandbox, "3", "s3", "u3");

    sandbox
        .cmd()
        .args(["winners", "bounty-1", "available", "--total", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 4 5"));

    sandbox
        .cmd()
        .args(["--json", "winners", "bounty-1", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"totalAmount\": 200.0"));
}

#[test]
fn test_winner_same_user_moves_position() {
    let sandbox = Sandbox::new();
    add_winner(&sandbox, "1", "s1", "u1");
    add_winner(&sandbox, "2", "s1", "u1");

    sandbox
        .cmd()
        .args(["winners", "bounty-1", "available"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 3"));
}

#[test]
fn test_winner_position_zero_rejected() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args([
            "winners",
            "bounty-1",
            "add",
            "--position",
            "0",
            "--submission",
            "s1",
            "--user",
            "u1",
            "--name",
            "Ada",
            "--amount",
            "10",
        ])
        .assert()
        .failure();
}

#[test]
fn test_winner_available_total_is_bounded() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["winners", "bounty-1", "available", "--total", "4000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--total"));

    sandbox
        .cmd()
        .args(["winners", "bounty-1", "available", "--total", "0"])
        .assert()
        .failure();

    sandbox
        .cmd()
        .args(["winners", "bounty-1", "available", "--total", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 2 3"));
}

#[test]
fn test_winner_remove_missing_position_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["winners", "bounty-1", "remove", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No winner at position 2"));
}

#[test]
fn test_winner_submit_empty_draft_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["winners", "bounty-1", "submit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No winners drafted"));
}

#[test]
fn test_winner_drafts_are_per_bounty() {
    let sandbox = Sandbox::new();
    add_winner(&sandbox, "1", "s1", "u1");

    sandbox
        .cmd()
        .args(["winners", "bounty-2", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No winners drafted for bounty-2"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_path_uses_config_dir_override() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_reads_project_file() {
    let sandbox = Sandbox::new();
    std::fs::write(
        sandbox.cwd.path().join("bountyboard.toml"),
        "[backend]\nurl = \"https://bounties.example.com\"\n",
    )
    .unwrap();

    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://bounties.example.com"));
}

#[test]
fn test_backend_flag_overrides_config() {
    let sandbox = Sandbox::new();
    std::fs::write(
        sandbox.cwd.path().join("bountyboard.toml"),
        "[backend]\nurl = \"https://bounties.example.com\"\n",
    )
    .unwrap();

    sandbox
        .cmd()
        .args(["--backend", "http://localhost:9999", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:9999"));
}
