//! Unit tests for registry client

use super::*;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn package_body() -> serde_json::Value {
    serde_json::json!({
        "name": "test-package",
        "dist-tags": { "latest": "1.1.0" },
        "versions": {
            "1.0.0": { "version": "1.0.0" },
            "1.1.0": {
                "version": "1.1.0",
                "peerDependencies": { "@strato/core": "^4.0.0" }
            },
            "2.0.0-beta.1": { "version": "2.0.0-beta.1" }
        }
    })
}

async fn mock_client(server: &MockServer) -> RegistryClient {
    RegistryClient::with_registry_url(server.uri()).unwrap()
}

#[tokio::test]
async fn test_registry_client_creation() {
    let client = RegistryClient::new().unwrap();
    assert_eq!(client.base_url, "https://registry.npmjs.org");
    assert_eq!(client.retry_config.max_retries, 3);
}

#[tokio::test]
async fn test_encode_package_name() {
    let client = RegistryClient::new().unwrap();

    // Regular package
    assert_eq!(client.encode_package_name("left-pad"), "left-pad");

    // Scoped package
    assert_eq!(
        client.encode_package_name("@strato/core"),
        "@strato%2fcore"
    );
}

#[tokio::test]
async fn test_auth_header_values() {
    let bearer = AuthConfig {
        token: Some("secret".to_string()),
        ..Default::default()
    };
    assert_eq!(auth_header(&bearer), Some("Bearer secret".to_string()));

    let basic = AuthConfig {
        username: Some("user".to_string()),
        password: Some("pass".to_string()),
        ..Default::default()
    };
    assert_eq!(
        auth_header(&basic),
        Some("Basic dXNlcjpwYXNz".to_string())
    );

    assert_eq!(auth_header(&AuthConfig::default()), None);
}

#[tokio::test]
async fn test_fetch_metadata_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test-package"))
        .and(header("Accept", "application/vnd.npm.install-v1+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(package_body()))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server).await;
    let document = client.fetch_metadata("test-package").await.unwrap();

    assert_eq!(document.name, "test-package");
    assert_eq!(document.versions.len(), 3);
    assert_eq!(
        document.dist_tags.get("latest"),
        Some(&"1.1.0".to_string())
    );
}

#[tokio::test]
async fn test_fetch_metadata_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nonexistent-package"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server).await;
    let err = client.fetch_metadata("nonexistent-package").await.unwrap_err();

    assert!(matches!(err, StratoError::PackageNotFound { name } if name == "nonexistent-package"));
}

#[tokio::test]
async fn test_resolve_version_range() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test-package"))
        .respond_with(ResponseTemplate::new(200).set_body_json(package_body()))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server).await;

    // Highest stable version in range; the 2.0.0-beta.1 prerelease is ignored
    let spec = VersionSpec::parse("^1.0.0").unwrap();
    let version = client.resolve_version("test-package", &spec).await.unwrap();
    assert_eq!(version, Version::new(1, 1, 0));

    // latest dist-tag
    let version = client
        .resolve_version("test-package", &VersionSpec::Latest)
        .await
        .unwrap();
    assert_eq!(version, Version::new(1, 1, 0));
}

#[tokio::test]
async fn test_peer_dependencies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test-package"))
        .respond_with(ResponseTemplate::new(200).set_body_json(package_body()))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server).await;

    let peers = client
        .peer_dependencies("test-package", &Version::new(1, 1, 0))
        .await
        .unwrap();
    assert_eq!(peers.get("@strato/core"), Some(&"^4.0.0".to_string()));

    // A version without declared peers yields an empty map
    let peers = client
        .peer_dependencies("test-package", &Version::new(1, 0, 0))
        .await
        .unwrap();
    assert!(peers.is_empty());
}
