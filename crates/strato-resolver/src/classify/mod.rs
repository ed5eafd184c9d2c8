//! Dependency specifier classification.
//!
//! Splits a dependency map into the entries the registry can resolve and the
//! entries it cannot. Unresolvable entries (git references, tarball URLs,
//! malformed strings) are preserved verbatim and merged back after
//! resolution.

use strato_config::DependencyMap;
use strato_core::types::VersionSpec;

/// Result of classifying a dependency map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    /// Entries resolvable against the registry, key-sorted
    pub valid: DependencyMap,
    /// Everything else, preserved verbatim, key-sorted
    pub invalid: DependencyMap,
}

/// Split a dependency map into resolvable and unresolvable entries.
///
/// Every entry lands in exactly one bucket; both buckets are independently
/// re-sorted into ascending key order.
pub fn classify_entries(map: &DependencyMap) -> Classified {
    let mut classified = Classified::default();

    for (name, specifier) in map {
        if VersionSpec::is_valid(specifier) {
            classified.valid.insert(name.clone(), specifier.clone());
        } else {
            classified.invalid.insert(name.clone(), specifier.clone());
        }
    }

    classified.valid.sort_keys();
    classified.invalid.sort_keys();
    classified
}
