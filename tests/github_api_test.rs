use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skpkg::broadcast::{BroadcastMode, broadcast, fetch_issue};
use skpkg::error::SkpkgError;
use skpkg::github::{GitHubClient, IssueContent};
use skpkg::tracker::{GitHubTracker, IssueTracker};
use skpkg::url::RepoUrl;

fn tracker_for(server: &MockServer) -> GitHubTracker {
    let client = GitHubClient::new(Some(&server.uri()), Some("test-token".to_owned()))
        .expect("client against mock server");
    GitHubTracker::new(client)
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "message": "Not Found",
        "documentation_url": "https://docs.github.com/rest"
    }))
}

fn issue() -> IssueContent {
    IssueContent {
        title: "Drop Python 3.10".to_owned(),
        body: "Update the CI matrix.".to_owned(),
    }
}

#[tokio::test]
async fn fetch_issue_reads_title_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/issues/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 7,
            "title": "Drop Python 3.10",
            "body": "Update the CI matrix.",
            "state": "open"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetched = fetch_issue(&tracker_for(&server), "https://github.com/o/r/issues/7")
        .await
        .unwrap();
    assert_eq!(fetched.content, issue());
    assert_eq!(fetched.source_repo_url(), "https://github.com/o/r");
}

#[tokio::test]
async fn fetch_issue_with_null_body_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/issues/8"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"title": "t", "body": null})),
        )
        .mount(&server)
        .await;

    let fetched = fetch_issue(&tracker_for(&server), "https://github.com/o/r/issues/8")
        .await
        .unwrap();
    assert_eq!(fetched.content.body, "");
}

#[tokio::test]
async fn missing_issue_is_issue_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/issues/999"))
        .respond_with(not_found())
        .mount(&server)
        .await;

    let err = fetch_issue(&tracker_for(&server), "https://github.com/o/r/issues/999")
        .await
        .unwrap_err();
    assert!(matches!(err, SkpkgError::IssueNotFound { url } if url.ends_with("/999")));
}

#[tokio::test]
async fn repo_check_requires_owner_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/with-owner"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"owner": {"login": "o"}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/o/no-owner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "no-owner"})))
        .mount(&server)
        .await;

    let tracker = tracker_for(&server);
    let ok = RepoUrl::parse("https://github.com/o/with-owner").unwrap();
    let bad = RepoUrl::parse("https://github.com/o/no-owner").unwrap();
    assert!(tracker.probe_repo(&ok).await.is_ok());
    assert!(tracker.probe_repo(&bad).await.is_err());
}

#[tokio::test]
async fn create_posts_title_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/o/a/issues"))
        .and(body_json(json!({
            "title": "Drop Python 3.10",
            "body": "Update the CI matrix."
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"number": 1})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/o/locked/issues"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "Issues are disabled for this repo"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let targets = ["https://github.com/o/a", "https://github.com/o/locked"];
    let outcome = broadcast(
        &tracker_for(&server),
        &issue(),
        targets,
        BroadcastMode::Live,
        |_| true,
    )
    .await;
    assert_eq!(outcome.succeeded_urls(), vec!["https://github.com/o/a"]);
    assert_eq!(outcome.failed_urls(), vec!["https://github.com/o/locked"]);
}

#[tokio::test]
async fn dry_run_against_api_never_posts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"owner": {"login": "o"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let targets = ["https://github.com/o/r1", "https://not-github.com/o/r2"];
    let outcome = broadcast(
        &tracker_for(&server),
        &issue(),
        targets,
        BroadcastMode::DryRun,
        |_| true,
    )
    .await;
    assert_eq!(outcome.non_github_urls(), vec!["https://not-github.com/o/r2"]);
    assert!(outcome.failed_urls().is_empty());
    assert!(outcome.summary().starts_with("Dry run: no issues were created."));
}
