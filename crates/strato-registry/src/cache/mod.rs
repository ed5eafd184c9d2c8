//! Metadata caching with TTL support

use std::time::{Duration, SystemTime};

use dashmap::DashMap;

use crate::api::PackageDocument;

/// Cache entry with TTL
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Cached metadata
    pub document: PackageDocument,
    /// When the entry was stored
    pub stored_at: SystemTime,
    /// Time-to-live duration
    pub ttl: Duration,
}

impl CacheEntry {
    /// Create new cache entry with default TTL (1 hour)
    pub fn new(document: PackageDocument) -> Self {
        Self::with_ttl(document, Duration::from_secs(3600))
    }

    /// Create cache entry with custom TTL
    pub fn with_ttl(document: PackageDocument, ttl: Duration) -> Self {
        Self {
            document,
            stored_at: SystemTime::now(),
            ttl,
        }
    }

    /// Check if cache entry is still fresh
    pub fn is_fresh(&self) -> bool {
        match self.stored_at.elapsed() {
            Ok(elapsed) => elapsed < self.ttl,
            Err(_) => false, // Clock went backwards, consider stale
        }
    }
}

/// In-memory metadata cache with TTL
#[derive(Debug, Default)]
pub struct MetadataCache {
    /// Cache storage
    cache: DashMap<String, CacheEntry>,
}

impl MetadataCache {
    /// Create new metadata cache
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    /// Get cached metadata if fresh
    pub fn get(&self, package_name: &str) -> Option<PackageDocument> {
        let entry = self.cache.get(package_name)?;
        if entry.is_fresh() {
            Some(entry.document.clone())
        } else {
            drop(entry);
            self.cache.remove(package_name);
            None
        }
    }

    /// Store metadata with default TTL
    pub fn insert(&self, package_name: String, document: PackageDocument) {
        self.cache.insert(package_name, CacheEntry::new(document));
    }

    /// Number of cached entries, fresh or not
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
