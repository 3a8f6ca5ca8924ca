//! # vize_cadre
//!
//! Cadre - The frame that mounts Vue single-file components into a host bundler.
//!
//! ## Name Origin
//!
//! A **cadre** (/ˈkɑːdreɪ/, French for "frame") is what holds a canvas in place
//! on the wall. `vize_cadre` holds `.vue` files inside a bundler's module graph:
//! it resolves their specifiers, splits each component into per-facet virtual
//! modules and stitches the compiled pieces back into one component module.
//!
//! ## Architecture
//!
//! ```text
//!  resolve(specifier) ──► PathResolver ──► ComponentIdentity (path + facet)
//!                                                   │
//!  load(identity) ──► FacetCompiler ──► SfcCompiler (parse / compile_*)
//!                           │
//!                           └─ whole file ──► synthesize() ──► component module
//!
//!  on_end(metafile) ──► collect_style_outputs() ──► CSS collector
//! ```
//!
//! Template, script and style compilation are delegated to an [`SfcCompiler`];
//! the built-in descriptor parser and default-export rewrite can be replaced
//! by overriding the trait's provided methods.

pub mod cache;
pub mod compiler;
pub mod css;
pub mod descriptor;
pub mod error;
pub mod facet;
pub mod host;
pub mod identity;
pub mod options;
pub mod plugin;
pub mod resolve;
pub mod rewrite_default;
pub mod synthesize;

pub use compiler::{
    CompiledScript, CompiledStyle, CompiledTemplate, CompilerMessage, ParseOptions, ParseOutput,
    ScriptCompileOptions, ScriptDialect, SfcCompiler, StyleCompileOptions, TemplateCompileOptions,
};
pub use descriptor::SfcDescriptor;
pub use error::{CadreError, CadreResult};
pub use host::{
    BuildOptions, BuildResult, LoadArgs, LoadOutcome, Loader, Message, Metafile, OnLoadOutput,
    ResolveArgs, ResolveResult, ResolvedRequest,
};
pub use identity::{ComponentIdentity, Facet};
pub use options::{load_options, AliasRule, AliasRules, VuePluginOptions};
pub use plugin::VuePlugin;
pub use resolve::{PathResolver, Resolved};
