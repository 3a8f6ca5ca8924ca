//! Descriptor cache.
//!
//! Every facet request re-reads its file; when enabled, this cache lets the
//! requests for one unchanged file share a single parse. Entries are keyed on
//! the physical path and validated against a content hash, so an edited file
//! is always re-parsed. Failed parses are never stored.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use vize_carton::hash::hash_str;

use crate::descriptor::SfcDescriptor;

#[derive(Debug)]
struct CacheEntry {
    content_hash: u64,
    source_map: bool,
    descriptor: Arc<SfcDescriptor>,
}

/// Parsed descriptors shared across concurrent loads.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: DashMap<PathBuf, CacheEntry>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the descriptor for `path`, valid only if `content` is unchanged.
    pub fn get(&self, path: &Path, content: &str, source_map: bool) -> Option<Arc<SfcDescriptor>> {
        let entry = self.entries.get(path)?;
        (entry.content_hash == hash_str(content) && entry.source_map == source_map)
            .then(|| Arc::clone(&entry.descriptor))
    }

    /// Store a successfully parsed descriptor.
    pub fn insert(&self, path: &Path, content: &str, source_map: bool, descriptor: Arc<SfcDescriptor>) {
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                content_hash: hash_str(content),
                source_map,
                descriptor,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
