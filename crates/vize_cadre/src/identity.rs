//! Virtual module identities.
//!
//! One physical `.vue` file is addressed as up to four modules:
//!
//! - `/src/Foo.vue` - the component itself
//! - `/src/Foo.vue?vue&type=script` - its script facet
//! - `/src/Foo.vue?vue&type=template` - its template facet
//! - `/src/Foo.vue?vue&type=style` - its style facet
//!
//! The facet is recognized once, at resolution time, and travels to the load
//! step inside [`ComponentIdentity`].

use std::fmt;
use std::path::{Path, PathBuf};

use vize_carton::path::to_slash_string;

use crate::resolve::{PathResolver, Resolved};

/// Extension of component files.
pub const SFC_EXTENSION: &str = ".vue";

/// Query prefix shared by all facet markers.
pub const FACET_QUERY_PREFIX: &str = "?vue&type=";

/// Which aspect of a component a module id addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    WholeFile,
    Script,
    Template,
    Style,
}

impl Facet {
    /// Facet marker appended to the physical path, if any.
    pub const fn query(self) -> Option<&'static str> {
        match self {
            Facet::WholeFile => None,
            Facet::Script => Some("?vue&type=script"),
            Facet::Template => Some("?vue&type=template"),
            Facet::Style => Some("?vue&type=style"),
        }
    }

    /// Recognize the facet a specifier addresses.
    ///
    /// Checked in the same order the shapes are registered: a trailing `.vue`
    /// first, then the template, script and style markers.
    pub fn from_specifier(specifier: &str) -> Option<Facet> {
        if specifier.ends_with(SFC_EXTENSION) {
            return Some(Facet::WholeFile);
        }
        [Facet::Template, Facet::Script, Facet::Style]
            .into_iter()
            .find(|facet| facet.query().is_some_and(|q| specifier.contains(q)))
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Facet::WholeFile => "component",
            Facet::Script => "script",
            Facet::Template => "template",
            Facet::Style => "style",
        })
    }
}

/// Split a specifier into its physical part and its query remainder.
///
/// The query starts at the first `?` that has at least one character after
/// it. `physical + query` always equals the input.
pub fn split_query(specifier: &str) -> (&str, &str) {
    match specifier.find('?') {
        Some(index) if index + 1 < specifier.len() => specifier.split_at(index),
        _ => (specifier, ""),
    }
}

/// A facet-qualified module identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentIdentity {
    /// Absolute physical path; the only key used for reading and watching.
    pub path: PathBuf,
    pub facet: Facet,
    /// Query remainder as submitted (empty for the whole-file identity).
    pub query: String,
}

impl ComponentIdentity {
    /// The whole-file identity of a physical component.
    pub fn whole_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            facet: Facet::WholeFile,
            query: String::new(),
        }
    }

    /// The module id handed back to the host.
    pub fn specifier(&self) -> String {
        let mut out = to_slash_string(&self.path);
        out.push_str(&self.query);
        out
    }

    /// Module id of another facet of the same physical file.
    pub fn facet_specifier(&self, facet: Facet) -> String {
        let mut out = to_slash_string(&self.path);
        if let Some(query) = facet.query() {
            out.push_str(query);
        }
        out
    }
}

/// Result of resolving a recognized specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityResolution {
    /// A component facet backed by a file on disk.
    Component(ComponentIdentity),
    /// The alias table rewrote the specifier into a bare module name.
    Bare(String),
}

/// Resolve a specifier into a component identity.
///
/// Returns `None` when the specifier has none of the recognized shapes.
pub fn resolve_identity(
    resolver: &PathResolver,
    specifier: &str,
    resolve_dir: Option<&Path>,
) -> Option<IdentityResolution> {
    let facet = Facet::from_specifier(specifier)?;
    let (physical, query) = split_query(specifier);

    let resolution = match resolver.resolve(physical, resolve_dir) {
        Resolved::Path(path) => IdentityResolution::Component(ComponentIdentity {
            path,
            facet,
            query: query.to_string(),
        }),
        Resolved::Bare(mut name) => {
            name.push_str(query);
            IdentityResolution::Bare(name)
        }
    };
    Some(resolution)
}
