//! Integration tests for npm package resolution using wiremock

use repo_score_lib::facts::Resolver;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn registry_with(package_path: &str, body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(package_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_scoped_package_with_object_repository() {
    let server = registry_with(
        "/@scope%2Fwidget",
        json!({ "repository": { "type": "git", "url": "git+ssh://git@github.com/scope-org/widget.git" } }),
    )
    .await;

    let repo = Resolver::new(server.uri())
        .unwrap()
        .resolve("https://www.npmjs.com/package/@scope/widget")
        .await
        .unwrap();

    assert_eq!(repo.owner(), "scope-org");
    assert_eq!(repo.name(), "widget");
}

#[tokio::test]
async fn test_shorthand_string_repository() {
    let server = registry_with("/tiny", json!({ "repository": "github:someone/tiny" })).await;

    let repo = Resolver::new(server.uri())
        .unwrap()
        .resolve("https://npmjs.com/package/tiny")
        .await
        .unwrap();

    assert_eq!(repo.to_string(), "someone/tiny");
}

#[tokio::test]
async fn test_package_without_repository_fails() {
    let server = registry_with("/orphan", json!({ "name": "orphan" })).await;

    let result = Resolver::new(server.uri())
        .unwrap()
        .resolve("https://www.npmjs.com/package/orphan")
        .await;

    let _ = result.unwrap_err();
}

#[tokio::test]
async fn test_non_github_repository_fails() {
    let server = registry_with(
        "/elsewhere",
        json!({ "repository": { "type": "git", "url": "https://gitlab.com/someone/elsewhere.git" } }),
    )
    .await;

    let result = Resolver::new(server.uri())
        .unwrap()
        .resolve("https://www.npmjs.com/package/elsewhere")
        .await;

    let _ = result.unwrap_err();
}

#[tokio::test]
async fn test_registry_server_error_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = Resolver::new(server.uri())
        .unwrap()
        .resolve("https://www.npmjs.com/package/anything")
        .await;

    let _ = result.unwrap_err();
}
