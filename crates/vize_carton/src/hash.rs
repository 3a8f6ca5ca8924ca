//! Hashing utilities.
//!
//! xxHash3 backs content-based cache invalidation, SHA-256 backs the short
//! component ids that end up in generated code and scoped CSS selectors.

use sha2::{Digest, Sha256};
use xxhash_rust::xxh3::xxh3_64;

/// Length of a component synthesis id, in hex characters.
pub const SYNTHESIS_ID_LEN: usize = 8;

/// Compute a 64-bit hash of the given string using xxHash3.
#[inline]
pub fn hash_str(data: &str) -> u64 {
    xxh3_64(data.as_bytes())
}

/// Derive the 8-character component id from a root-relative, slash-normalized path.
///
/// The same input always yields the same id, so every facet of a component
/// agrees on the `data-v-<id>` scope token.
pub fn synthesis_id(relative_path: &str) -> String {
    let digest = Sha256::digest(relative_path.as_bytes());
    let mut hex = String::with_capacity(SYNTHESIS_ID_LEN);
    for byte in digest.iter().take(SYNTHESIS_ID_LEN / 2) {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_consistency() {
        let content = "Hello, World!";
        assert_eq!(hash_str(content), hash_str(content));
    }

    #[test]
    fn test_hash_difference() {
        assert_ne!(hash_str("Hello"), hash_str("World"));
    }

    #[test]
    fn test_synthesis_id_matches_sha256_prefix() {
        // sha256("src/Foo.vue") = a3dd06a1...
        assert_eq!(synthesis_id("src/Foo.vue"), "a3dd06a1");
    }

    #[test]
    fn test_synthesis_id_shape() {
        let id = synthesis_id("components/Button.vue");
        assert_eq!(id.len(), SYNTHESIS_ID_LEN);
        assert!(id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        assert_ne!(id, synthesis_id("components/Input.vue"));
    }
}
