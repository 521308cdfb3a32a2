//! Event payload parsing tests using on-disk payload files, the way the
//! runner delivers them.

use std::io::Write;

use pr_ticket_check::context::{AuthorKind, ContextError, PullRequestContext};

fn write_payload(payload: &serde_json::Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{payload}").unwrap();
    file
}

#[test]
fn reads_a_pull_request_event_file() {
    let payload = serde_json::json!({
        "action": "opened",
        "number": 42,
        "pull_request": {
            "number": 42,
            "title": "Add login flow",
            "body": "References TICK-7",
            "head": { "ref": "feature/TICK-7-login" },
            "user": { "login": "octocat", "type": "User" }
        },
        "repository": {
            "name": "test-repo",
            "owner": { "login": "test-owner", "type": "Organization" }
        }
    });
    let file = write_payload(&payload);

    let ctx = PullRequestContext::from_event_path(file.path()).unwrap();

    assert_eq!(ctx.owner, "test-owner");
    assert_eq!(ctx.repo, "test-repo");
    assert_eq!(ctx.number, 42);
    assert_eq!(ctx.title, "Add login flow");
    assert_eq!(ctx.branch, "feature/TICK-7-login");
    assert_eq!(ctx.body.as_deref(), Some("References TICK-7"));
    assert_eq!(ctx.author_login, "octocat");
    assert_eq!(ctx.author_kind, AuthorKind::User);
}

#[test]
fn bot_author_kind_comes_through() {
    let payload = serde_json::json!({
        "pull_request": {
            "number": 7,
            "title": "Bump serde",
            "body": null,
            "head": { "ref": "dependabot/cargo/serde-1.0" },
            "user": { "login": "dependabot[bot]", "type": "Bot" }
        },
        "repository": {
            "name": "test-repo",
            "owner": { "login": "test-owner", "type": "User" }
        }
    });
    let file = write_payload(&payload);

    let ctx = PullRequestContext::from_event_path(file.path()).unwrap();

    assert_eq!(ctx.author_kind, AuthorKind::Bot);
    assert!(ctx.body.is_none());
    assert_eq!(ctx.sender(), "dependabot");
}

#[test]
fn missing_file_is_an_unreadable_payload_error() {
    let err =
        PullRequestContext::from_event_path(std::path::Path::new("/nonexistent/event.json"))
            .unwrap_err();
    assert!(matches!(err, ContextError::UnreadablePayload { .. }));
}

#[test]
fn non_pull_request_event_is_rejected() {
    let payload = serde_json::json!({
        "action": "created",
        "repository": {
            "name": "test-repo",
            "owner": { "login": "test-owner", "type": "User" }
        }
    });
    let file = write_payload(&payload);

    let err = PullRequestContext::from_event_path(file.path()).unwrap_err();
    assert!(matches!(err, ContextError::NotAPullRequest));
}
