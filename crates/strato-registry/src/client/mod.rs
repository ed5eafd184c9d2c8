//! HTTP client implementation with connection pooling and retry logic

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use strato_core::error::StratoError;
use strato_core::types::{Version, VersionSpec};
use tracing::debug;

use crate::api::PackageDocument;
use crate::RegistryResult;

const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Configuration for exponential backoff retry logic
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

/// Authentication configuration for registry access
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Bearer token for authentication
    pub token: Option<String>,
    /// Basic auth username
    pub username: Option<String>,
    /// Basic auth password
    pub password: Option<String>,
}

/// HTTP client for npm-compatible registry operations
#[derive(Debug, Clone)]
pub struct RegistryClient {
    /// Underlying HTTP client with connection pooling
    client: Client,
    /// Retry configuration
    retry_config: RetryConfig,
    /// Base registry URL
    base_url: String,
}

impl RegistryClient {
    /// Create new registry client against the default registry
    pub fn new() -> RegistryResult<Self> {
        Self::with_config(DEFAULT_REGISTRY_URL.to_string(), None, RetryConfig::default())
    }

    /// Create registry client against a specific registry URL
    pub fn with_registry_url(base_url: String) -> RegistryResult<Self> {
        Self::with_config(base_url, None, RetryConfig::default())
    }

    /// Create registry client with authentication
    pub fn with_auth(auth: AuthConfig) -> RegistryResult<Self> {
        Self::with_config(DEFAULT_REGISTRY_URL.to_string(), Some(auth), RetryConfig::default())
    }

    /// Create registry client with custom configuration
    fn with_config(
        base_url: String,
        auth: Option<AuthConfig>,
        retry_config: RetryConfig,
    ) -> RegistryResult<Self> {
        let mut builder = ClientBuilder::new()
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .user_agent(concat!("strato/", env!("CARGO_PKG_VERSION")));

        if let Some(auth_config) = auth {
            if let Some(header_value) = auth_header(&auth_config) {
                let mut headers = reqwest::header::HeaderMap::new();
                let value = header_value.parse().map_err(|e| StratoError::Network {
                    message: "Invalid authorization header".to_string(),
                    source: Some(Box::new(e)),
                })?;
                headers.insert(reqwest::header::AUTHORIZATION, value);
                builder = builder.default_headers(headers);
            }
        }

        let client = builder.build().map_err(|e| StratoError::Network {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            client,
            retry_config,
            base_url,
        })
    }

    /// Execute HTTP request with exponential backoff retry logic
    async fn with_retry<F, Fut, T>(&self, operation: F) -> RegistryResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = RegistryResult<T>>,
    {
        let mut delay = self.retry_config.initial_delay;
        let mut last_error = None;

        for attempt in 0..=self.retry_config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    // Only transient failures are worth another attempt
                    let retryable = error.is_recoverable();
                    last_error = Some(error);

                    if attempt == self.retry_config.max_retries || !retryable {
                        break;
                    }

                    tokio::time::sleep(delay).await;

                    delay = std::cmp::min(
                        Duration::from_millis(
                            (delay.as_millis() as f64 * self.retry_config.multiplier) as u64,
                        ),
                        self.retry_config.max_delay,
                    );
                },
            }
        }

        Err(last_error.unwrap_or_else(|| StratoError::Network {
            message: "Retry operation failed without error".to_string(),
            source: None,
        }))
    }

    /// Fetch abbreviated package metadata with retry logic
    pub async fn fetch_metadata(&self, package_name: &str) -> RegistryResult<PackageDocument> {
        let encoded_name = self.encode_package_name(package_name);
        let url = format!("{}/{}", self.base_url, encoded_name);
        debug!(package = package_name, "fetching registry metadata");

        self.with_retry(|| async {
            let response = self
                .client
                .get(&url)
                .header("Accept", "application/vnd.npm.install-v1+json")
                .send()
                .await
                .map_err(|e| StratoError::Network {
                    message: format!("Failed to fetch metadata for '{}': {}", package_name, e),
                    source: Some(Box::new(e)),
                })?;

            match response.status() {
                reqwest::StatusCode::OK => {
                    response.json::<PackageDocument>().await.map_err(|e| {
                        StratoError::Network {
                            message: format!(
                                "Failed to parse metadata for '{}': {}",
                                package_name, e
                            ),
                            source: Some(Box::new(e)),
                        }
                    })
                },
                reqwest::StatusCode::NOT_FOUND => Err(StratoError::PackageNotFound {
                    name: package_name.to_string(),
                }),
                status => Err(StratoError::Network {
                    message: format!("Registry returned status {} for '{}'", status, package_name),
                    source: None,
                }),
            }
        })
        .await
    }

    /// Resolve a range or dist-tag to the concrete version it names
    pub async fn resolve_version(
        &self,
        package_name: &str,
        spec: &VersionSpec,
    ) -> RegistryResult<Version> {
        let document = self.fetch_metadata(package_name).await?;
        document.select(spec)
    }

    /// Fetch the declared peer dependencies of one published version
    pub async fn peer_dependencies(
        &self,
        package_name: &str,
        version: &Version,
    ) -> RegistryResult<indexmap::IndexMap<String, String>> {
        let document = self.fetch_metadata(package_name).await?;
        Ok(document.peer_dependencies(version))
    }

    /// Encode package name for URL (handle scoped packages)
    fn encode_package_name(&self, name: &str) -> String {
        if name.starts_with('@') {
            // Scoped package: @org/pkg -> @org%2fpkg
            name.replace('/', "%2f")
        } else {
            name.to_string()
        }
    }
}

fn auth_header(auth: &AuthConfig) -> Option<String> {
    if let Some(ref token) = auth.token {
        return Some(format!("Bearer {}", token));
    }
    if let (Some(username), Some(password)) = (&auth.username, &auth.password) {
        use base64::{engine::general_purpose, Engine as _};
        let encoded = general_purpose::STANDARD.encode(format!("{}:{}", username, password));
        return Some(format!("Basic {}", encoded));
    }
    None
}

#[cfg(test)]
mod tests;
