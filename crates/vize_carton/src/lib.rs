//! Carton - The artist's toolbox for Vize.
//!
//! This crate provides the small, dependency-light utilities shared by the Vize
//! crates, much like a carton (artist's portfolio case) holds all the essential
//! tools and materials an artist needs for their work.
//!
//! # Modules
//!
//! - **hash**: content hashing for change detection and stable component ids
//! - **path**: lexical path algebra (resolve, join, relative) with no filesystem access
//!
//! # Example
//!
//! ```
//! use vize_carton::hash::synthesis_id;
//! use vize_carton::path::normalize_slashes;
//!
//! let id = synthesis_id(&normalize_slashes("src\\Foo.vue"));
//! assert_eq!(id.len(), 8);
//! ```

pub mod hash;
pub mod path;

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::FxHashMap;
