//! Import specifier resolution.
//!
//! Pure path algebra: relative specifiers, alias prefixes and root-relative
//! specifiers become absolute paths, or fall through as bare module names
//! for the host to resolve.

use std::path::{Path, PathBuf};

use vize_carton::path;

use crate::options::{AliasRule, AliasRules};

/// Outcome of resolving a specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// An absolute filesystem path.
    Path(PathBuf),
    /// A bare module name the host should keep resolving (e.g. a package).
    Bare(String),
}

impl Resolved {
    /// Render as the string handed back to the host.
    pub fn to_specifier(&self) -> String {
        match self {
            Resolved::Path(p) => path::to_slash_string(p),
            Resolved::Bare(name) => name.clone(),
        }
    }
}

/// Resolves specifiers against a fixed base directory and alias table.
#[derive(Debug, Clone)]
pub struct PathResolver {
    base: PathBuf,
    aliases: AliasRules,
}

impl PathResolver {
    pub fn new(base: PathBuf, aliases: AliasRules) -> Self {
        Self { base, aliases }
    }

    /// The resolution base.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Resolve `specifier`, using `resolve_dir` for relative specifiers when
    /// given and non-empty.
    pub fn resolve(&self, specifier: &str, resolve_dir: Option<&Path>) -> Resolved {
        if specifier.starts_with('.') {
            let dir = resolve_dir
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or(self.base.as_path());
            return Resolved::Path(path::resolve(dir, specifier));
        }

        if let Some(rule) = self.match_alias(specifier) {
            let rest = &specifier[rule.find.len()..];
            let replacement = rule
                .replacement
                .strip_suffix('/')
                .unwrap_or(rule.replacement.as_str());
            let substituted = format!("{replacement}{rest}");

            tracing::trace!("alias `{}` -> `{}`", specifier, substituted);

            if substituted.starts_with('.') || Path::new(&substituted).is_absolute() {
                return Resolved::Path(path::resolve(&self.base, &substituted));
            }
            return Resolved::Bare(substituted);
        }

        let mut rooted = path::to_slash_string(&self.base);
        rooted.push('/');
        if specifier.starts_with(&rooted) {
            return Resolved::Path(PathBuf::from(specifier));
        }

        Resolved::Path(path::join(&self.base, specifier))
    }

    /// First rule, in declared order, whose `find` is the specifier itself or
    /// a whole leading path segment of it.
    fn match_alias(&self, specifier: &str) -> Option<&AliasRule> {
        self.aliases.iter().find(|rule| {
            specifier
                .strip_prefix(rule.find.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}
