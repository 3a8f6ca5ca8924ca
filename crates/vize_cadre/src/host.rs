//! Host build tool contract.
//!
//! These types mirror the shapes a bundler plugin API exchanges with its
//! plugins (esbuild's `onResolve` / `onLoad` / `onEnd`). The host owns graph
//! traversal and output; the plugin only answers these calls.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use vize_carton::FxHashMap;

use crate::identity::ComponentIdentity;
use crate::options::AliasRules;

/// Namespace used for file-backed modules.
pub const FILE_NAMESPACE: &str = "file";

/// The host's initial build options, as seen (and amended) by the plugin at setup.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
    /// Working directory of the build. Relative values resolve against the CWD.
    #[serde(default)]
    pub abs_working_dir: Option<PathBuf>,

    /// Whether the host emits source maps.
    #[serde(default)]
    pub sourcemap: bool,

    /// Import alias rules.
    #[serde(default)]
    pub alias: Option<AliasRules>,

    /// Global constant replacements.
    #[serde(default)]
    pub define: FxHashMap<String, String>,
}

/// Arguments of a resolve call.
#[derive(Debug, Clone, Default)]
pub struct ResolveArgs {
    /// Import specifier as written by the importer.
    pub path: String,
    /// Directory of the importing module, if any.
    pub resolve_dir: Option<PathBuf>,
}

/// Opaque per-request data carried from resolve to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    /// The facet-qualified component identity.
    pub identity: ComponentIdentity,
    /// Directory the specifier was resolved against.
    pub resolve_dir: Option<PathBuf>,
}

/// Answer to a resolve call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveResult {
    /// Resolved path (absolute path plus query), or a bare module name.
    pub path: String,
    /// Host namespace the module lives in.
    pub namespace: String,
    /// Data handed back on the matching load call. `None` for bare module names.
    pub plugin_data: Option<ResolvedRequest>,
}

/// Arguments of a load call.
#[derive(Debug, Clone, Default)]
pub struct LoadArgs {
    /// Resolved path, as returned from resolve.
    pub path: String,
    /// Namespace, as returned from resolve.
    pub namespace: String,
    /// Plugin data, as returned from resolve.
    pub plugin_data: Option<ResolvedRequest>,
}

/// How the host should interpret loaded contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    Js,
    Ts,
    Css,
}

/// A successfully loaded module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnLoadOutput {
    pub contents: String,
    pub resolve_dir: PathBuf,
    pub loader: Loader,
    pub watch_files: Vec<PathBuf>,
}

/// Location of a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

/// A diagnostic reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub location: Option<Location>,
}

/// Outcome of a load call for a request this plugin owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The facet compiled into a module.
    Module(OnLoadOutput),
    /// The facet legitimately has no output (e.g. no `<template>` block).
    Empty,
    /// The facet failed; the host decides whether this fails the build.
    Diagnostics(Vec<Message>),
}

/// Result of a completed build, as passed to the end hook.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BuildResult {
    /// Output metadata, present only when the host was asked to produce it.
    #[serde(default)]
    pub metafile: Option<Metafile>,
}

/// Build output metadata (esbuild metafile layout).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Metafile {
    #[serde(default)]
    pub outputs: BTreeMap<String, MetafileOutput>,
}

/// One emitted file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetafileOutput {
    /// Contributing input module ids.
    #[serde(default)]
    pub inputs: BTreeMap<String, MetafileInput>,
}

/// Contribution of one input to an output.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafileInput {
    #[serde(default)]
    pub bytes_in_output: u64,
}
