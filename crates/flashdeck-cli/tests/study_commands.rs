//! E2E tests for `flashdeck study`.
//!
//! The session is saved between invocations, so each command here is a
//! separate process working on the same pass.

mod common;

use common::{assert_contains, Cli};

fn deck_with_cards(cli: &Cli, cards: &[(&str, &str)]) -> String {
    cli.login("student", "free");
    let id = cli.create_deck("Study");
    for (front, back) in cards {
        cli.success(&["card", "add", &id.to_string(), front, back]);
    }
    id.to_string()
}

#[test]
fn test_study_pass_with_keys() {
    let cli = Cli::new();
    let deck = deck_with_cards(&cli, &[("A", "1"), ("B", "2"), ("C", "3")]);

    let snapshot = cli.json(&["study", "start", &deck]);
    assert_eq!(snapshot["type"], "state_snapshot");
    assert_eq!(snapshot["front"], "A");
    assert!(snapshot["back"].is_null());

    // Grading before flipping is ignored.
    let ignored = cli.json(&["study", "key", "2"]);
    assert_eq!(ignored["index"], 0);

    cli.success(&["study", "key", "space"]);
    cli.success(&["study", "key", "2"]);
    cli.success(&["study", "key", "space"]);
    cli.success(&["study", "key", "1"]);
    cli.success(&["study", "key", "space"]);
    let finished = cli.json(&["study", "key", "arrowright"]);
    assert_eq!(finished["type"], "session_finished");

    let summary = cli.json(&["study", "summary"]);
    assert_eq!(summary["state"], "finished");
    assert_eq!(summary["correct"], 2);
    assert_eq!(summary["incorrect"], 1);
}

#[test]
fn test_study_navigation_and_restart() {
    let cli = Cli::new();
    let deck = deck_with_cards(&cli, &[("A", "1"), ("B", "2")]);
    cli.success(&["study", "start", &deck]);

    let prev = cli.json(&["study", "prev"]);
    assert_eq!(prev["type"], "state_snapshot");
    assert_eq!(prev["index"], 0);

    let next = cli.json(&["study", "next"]);
    assert_eq!(next["type"], "card_advanced");

    let flipped = cli.json(&["study", "flip"]);
    assert_eq!(flipped["flipped"], true);
    let status = cli.json(&["study", "status"]);
    assert_eq!(status["back"], "2");

    cli.success(&["study", "grade", "correct"]);
    cli.success(&["study", "restart"]);
    let status = cli.json(&["study", "status"]);
    assert_eq!(status["state"], "active");
    assert_eq!(status["position"], 1);
    assert_eq!(status["tally"]["correct"], 0);
}

#[test]
fn test_study_seeded_start_is_reproducible() {
    let cli = Cli::new();
    let deck = deck_with_cards(
        &cli,
        &[("A", "1"), ("B", "2"), ("C", "3"), ("D", "4"), ("E", "5")],
    );
    let first = cli.json(&["study", "start", &deck, "--seed", "7"]);
    let second = cli.json(&["study", "start", &deck, "--seed", "7"]);
    assert_eq!(first["front"], second["front"]);
}

#[test]
fn test_study_errors() {
    let cli = Cli::new();
    cli.login("student", "free");
    let empty = cli.create_deck("Empty");

    let stderr = cli.failure(&["study", "start", &empty.to_string()]);
    assert_contains(&stderr, "error:");

    let stderr = cli.failure(&["study", "status"]);
    assert_contains(&stderr, "no study session in progress");

    let deck = deck_with_cards(&cli, &[("A", "1")]);
    cli.success(&["study", "start", &deck]);
    cli.failure(&["study", "key", "escape"]);
    cli.success(&["study", "exit"]);
    cli.failure(&["study", "status"]);
}

#[test]
fn test_study_session_needs_sign_in() {
    let cli = Cli::new();
    let deck = deck_with_cards(&cli, &[("alice-q", "alice-a")]);
    cli.success(&["study", "start", &deck]);
    cli.success(&["auth", "logout"]);

    let stderr = cli.failure(&["study", "flip"]);
    assert_contains(&stderr, "not signed in");
    cli.failure(&["study", "status"]);

    // Signing out discards the session.
    cli.login("student", "free");
    let stderr = cli.failure(&["study", "status"]);
    assert_contains(&stderr, "no study session in progress");
}

#[test]
fn test_study_session_belongs_to_its_user() {
    let cli = Cli::new();
    cli.login("alice", "free");
    let deck = cli.create_deck("Private");
    cli.success(&["card", "add", &deck.to_string(), "alice-q", "alice-a"]);
    cli.success(&["study", "start", &deck.to_string()]);
    cli.success(&["study", "flip"]);

    cli.login("bob", "free");
    let (stdout, stderr, code) = cli.run(&["study", "status"]);
    assert_ne!(code, 0);
    assert!(!stdout.contains("alice"));
    assert_contains(&stderr, "no study session in progress");
    cli.failure(&["study", "key", "2"]);

    cli.login("alice", "free");
    let status = cli.json(&["study", "status"]);
    assert_eq!(status["front"], "alice-q");
    assert_eq!(status["back"], "alice-a");
}

#[test]
fn test_deleting_deck_ends_its_session() {
    let cli = Cli::new();
    let deck = deck_with_cards(&cli, &[("A", "1"), ("B", "2")]);
    cli.success(&["study", "start", &deck]);
    cli.success(&["deck", "delete", &deck]);

    let stderr = cli.failure(&["study", "flip"]);
    assert_contains(&stderr, &format!("deck {deck} not found"));
    let stderr = cli.failure(&["study", "status"]);
    assert_contains(&stderr, "no study session in progress");
}
