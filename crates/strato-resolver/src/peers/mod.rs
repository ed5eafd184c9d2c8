//! Framework peer-dependency closure.
//!
//! Packages under the framework's namespaces declare peers that a consuming
//! project must install itself. This module expands the dependency map with
//! every missing framework peer, transitively, using a worklist rather than
//! recursion. A peer is only added when absent and the map only grows, so
//! the closure terminates even when peer relationships are circular.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;

use strato_config::DependencyMap;
use strato_core::types::VersionSpec;
use strato_registry::{MetadataCache, RegistryClient};
use tracing::{debug, warn};

use crate::resolve::fetch_document;
use crate::ResolverResult;

/// Package namespaces whose peers are auto-installed
pub const RECOGNIZED_PREFIXES: &[&str] = &["@strato/", "@strato-sdk/"];

/// Infrastructure package silently skipped when declared as a peer
pub const IGNORED_PEER: &str = "@strato-sdk/toolchain";

/// Outcome of a peer-closure pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerReport {
    /// Framework peers added to the map, in discovery order
    pub added: Vec<String>,
    /// Peers outside the framework namespaces, reported once
    pub ignored: Vec<String>,
}

/// Check whether a package belongs to a recognized framework namespace
pub fn is_framework_package(name: &str) -> bool {
    RECOGNIZED_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Expand the map with the framework peer-dependency closure, in place.
///
/// Each added peer inherits the *declaring* package's specifier, not the
/// peer's own declared range. Entries still reading `latest` after the
/// closure settles are resolved to concrete versions.
pub async fn add_peer_dependencies(
    client: &Arc<RegistryClient>,
    cache: &Arc<MetadataCache>,
    map: &mut DependencyMap,
) -> ResolverResult<PeerReport> {
    let mut report = PeerReport::default();
    let mut ignored = BTreeSet::new();

    let mut queue: VecDeque<String> = map
        .keys()
        .filter(|name| is_framework_package(name))
        .cloned()
        .collect();
    let mut examined: HashSet<String> = queue.iter().cloned().collect();

    while let Some(name) = queue.pop_front() {
        let specifier = map
            .get(&name)
            .cloned()
            .unwrap_or_else(|| "latest".to_string());

        let Some(spec) = VersionSpec::parse(&specifier) else {
            debug!(package = name.as_str(), specifier = specifier.as_str(),
                "skipping peer scan for unresolvable specifier");
            continue;
        };

        let document = fetch_document(client, cache, &name).await?;
        let version = document.select(&spec)?;

        for (peer, range) in document.peer_dependencies(&version) {
            if map.contains_key(&peer) || peer == IGNORED_PEER {
                continue;
            }

            if is_framework_package(&peer) {
                // The peer tracks whatever version the declaring package uses
                map.insert(peer.clone(), specifier.clone());
                report.added.push(peer.clone());
                if examined.insert(peer.clone()) {
                    queue.push_back(peer);
                }
            } else {
                ignored.insert(format!("{}@{} (required by {})", peer, range, name));
            }
        }
    }

    set_dependency_versions(client, cache, map).await?;
    map.sort_keys();

    if !ignored.is_empty() {
        warn!(
            "Peer dependencies outside the framework namespaces were not added: {}",
            ignored.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }
    report.ignored = ignored.into_iter().collect();

    Ok(report)
}

/// Resolve entries still pointing at the `latest` dist-tag to concrete versions
async fn set_dependency_versions(
    client: &Arc<RegistryClient>,
    cache: &Arc<MetadataCache>,
    map: &mut DependencyMap,
) -> ResolverResult<()> {
    let pending: Vec<String> = map
        .iter()
        .filter(|(_, specifier)| specifier.as_str() == "latest")
        .map(|(name, _)| name.clone())
        .collect();

    for name in pending {
        let document = fetch_document(client, cache, &name).await?;
        let version = document.latest()?;
        map.insert(name, version.to_string());
    }

    Ok(())
}
