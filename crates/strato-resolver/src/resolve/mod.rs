//! Concurrent registry resolution of a batch of upgrade targets.
//!
//! Lookups are independent, so the batch fans out over a `JoinSet` and
//! results are re-associated with package names by key, never by position.
//! The batch is all-or-nothing: the first failed lookup fails the whole
//! operation and outstanding lookups are abandoned.

use std::sync::Arc;

use indexmap::IndexMap;
use std::collections::HashMap;
use strato_config::DependencyMap;
use strato_core::error::StratoError;
use strato_registry::{MetadataCache, PackageDocument, RegistryClient};
use tokio::task::JoinSet;

use crate::overrides::UpgradeTarget;
use crate::ResolverResult;

/// Fetch a package document, preferring the shared metadata cache
pub(crate) async fn fetch_document(
    client: &RegistryClient,
    cache: &MetadataCache,
    package_name: &str,
) -> ResolverResult<PackageDocument> {
    if let Some(document) = cache.get(package_name) {
        return Ok(document);
    }

    let document = client.fetch_metadata(package_name).await?;
    cache.insert(package_name.to_string(), document.clone());
    Ok(document)
}

/// Resolve every target to a concrete version string.
///
/// The output holds exactly the input's keys in the input's order.
pub async fn resolve_against_registry(
    client: &Arc<RegistryClient>,
    cache: &Arc<MetadataCache>,
    targets: &IndexMap<String, UpgradeTarget>,
) -> ResolverResult<DependencyMap> {
    let mut lookups = JoinSet::new();

    for (name, target) in targets {
        let client = Arc::clone(client);
        let cache = Arc::clone(cache);
        let name = name.clone();
        let spec = target.to_spec();

        lookups.spawn(async move {
            let document = fetch_document(&client, &cache, &name).await?;
            let version = document.select(&spec)?;
            Ok::<(String, String), StratoError>((name, version.to_string()))
        });
    }

    let mut resolved_by_name = HashMap::with_capacity(targets.len());
    while let Some(joined) = lookups.join_next().await {
        let (name, version) = joined.map_err(|e| StratoError::Network {
            message: format!("Registry lookup task failed: {}", e),
            source: None,
        })??;
        resolved_by_name.insert(name, version);
    }

    // Re-key in the callers' order; every spawned lookup reported exactly once
    let mut resolved = DependencyMap::with_capacity(targets.len());
    for name in targets.keys() {
        let version = resolved_by_name.remove(name).ok_or_else(|| {
            StratoError::Network {
                message: format!("Registry lookup for '{}' returned no result", name),
                source: None,
            }
        })?;
        resolved.insert(name.clone(), version);
    }

    Ok(resolved)
}
