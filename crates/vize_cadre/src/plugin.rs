//! The plugin surface the host calls into.
//!
//! [`VuePlugin::setup`] runs once per build; afterwards the host drives
//! [`VuePlugin::resolve`] and [`VuePlugin::load`] per module request and
//! [`VuePlugin::on_end`] once the build finishes.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::path::Path;

use futures::FutureExt;
use vize_carton::path;

use crate::compiler::SfcCompiler;
use crate::css::collect_style_outputs;
use crate::error::{CadreError, CadreResult};
use crate::facet::FacetCompiler;
use crate::host::{
    BuildOptions, BuildResult, LoadArgs, LoadOutcome, ResolveArgs, ResolveResult,
    ResolvedRequest, FILE_NAMESPACE,
};
use crate::identity::{resolve_identity, IdentityResolution};
use crate::options::VuePluginOptions;
use crate::resolve::PathResolver;

/// Defines the plugin guarantees exist, with their defaults.
pub const DEFAULT_DEFINES: [(&str, &str); 2] = [
    ("__VUE_OPTIONS_API__", "true"),
    ("__VUE_PROD_DEVTOOLS__", "false"),
];

type CssCollector = Box<dyn Fn(&Path) + Send + Sync>;

/// Vue single-file component plugin.
pub struct VuePlugin<C> {
    resolver: PathResolver,
    facets: FacetCompiler<C>,
    css_collector: Option<CssCollector>,
}

impl<C> fmt::Debug for VuePlugin<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VuePlugin")
            .field("resolver", &self.resolver)
            .field("css_collector", &self.css_collector.is_some())
            .finish_non_exhaustive()
    }
}

impl<C: SfcCompiler> VuePlugin<C> {
    /// Configure the plugin for one build.
    ///
    /// Fixes the resolution base, snapshots the alias table and injects the
    /// Vue feature-flag defines the host has not set itself.
    pub fn setup(
        options: VuePluginOptions,
        build: &mut BuildOptions,
        compiler: C,
    ) -> CadreResult<Self> {
        let cwd = std::env::current_dir().map_err(|e| CadreError::from_io(".".into(), e))?;
        let base = match &build.abs_working_dir {
            Some(dir) => path::resolve(&cwd, dir),
            None => path::normalize_lexically(&cwd),
        };

        for (name, value) in DEFAULT_DEFINES {
            build
                .define
                .entry(name.to_string())
                .or_insert_with(|| value.to_string());
        }

        let source_map = build.sourcemap || options.source_map;
        let aliases = build.alias.clone().unwrap_or_default();

        tracing::debug!(
            "vue plugin setup: base={}, aliases={}, source_map={}",
            base.display(),
            aliases.len(),
            source_map
        );

        Ok(Self {
            resolver: PathResolver::new(base.clone(), aliases),
            facets: FacetCompiler::new(compiler, options, base, source_map),
            css_collector: None,
        })
    }

    /// Report stylesheets emitted for components to `collector` at build end.
    pub fn with_css_collector(mut self, collector: impl Fn(&Path) + Send + Sync + 'static) -> Self {
        self.css_collector = Some(Box::new(collector));
        self
    }

    pub fn base(&self) -> &Path {
        self.resolver.base()
    }

    pub fn options(&self) -> &VuePluginOptions {
        self.facets.options()
    }

    pub fn compiler(&self) -> &C {
        self.facets.compiler()
    }

    /// Component id of the file at `path`.
    pub fn synthesis_id_for(&self, path: &Path) -> String {
        self.facets.synthesis_id(path)
    }

    /// Resolve a component specifier. `None` when the specifier is not ours.
    pub fn resolve(&self, args: &ResolveArgs) -> Option<ResolveResult> {
        let resolve_dir = args.resolve_dir.as_deref();
        let resolution = resolve_identity(&self.resolver, &args.path, resolve_dir)?;

        let result = match resolution {
            IdentityResolution::Component(identity) => ResolveResult {
                path: identity.specifier(),
                namespace: FILE_NAMESPACE.to_string(),
                plugin_data: Some(ResolvedRequest {
                    identity,
                    resolve_dir: args.resolve_dir.clone(),
                }),
            },
            IdentityResolution::Bare(name) => ResolveResult {
                path: name,
                namespace: FILE_NAMESPACE.to_string(),
                plugin_data: None,
            },
        };

        tracing::debug!("resolve `{}` -> `{}`", args.path, result.path);
        Some(result)
    }

    /// Load a module previously resolved by [`VuePlugin::resolve`].
    ///
    /// `None` when the request is not ours. Failures, including panics in the
    /// compiler, come back as [`LoadOutcome::Diagnostics`].
    pub async fn load(&self, args: &LoadArgs) -> Option<LoadOutcome> {
        if args.namespace != FILE_NAMESPACE {
            return None;
        }

        let request = match &args.plugin_data {
            Some(request) => request.clone(),
            None => match resolve_identity(&self.resolver, &args.path, None)? {
                IdentityResolution::Component(identity) => ResolvedRequest {
                    identity,
                    resolve_dir: None,
                },
                IdentityResolution::Bare(_) => return None,
            },
        };

        let loaded = AssertUnwindSafe(
            self.facets
                .load(&request.identity, request.resolve_dir.as_deref()),
        )
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(CadreError::Unknown(panic_message(panic))));

        let outcome = match loaded {
            Ok(Some(output)) => LoadOutcome::Module(output),
            Ok(None) => LoadOutcome::Empty,
            Err(e) => {
                tracing::warn!("failed to load {}: {}", args.path, e);
                LoadOutcome::Diagnostics(vec![e.to_message()])
            }
        };
        Some(outcome)
    }

    /// End-of-build hook: hand emitted component stylesheets to the collector.
    pub fn on_end(&self, result: &BuildResult) {
        let (Some(collector), Some(metafile)) = (&self.css_collector, &result.metafile) else {
            return;
        };
        for css in collect_style_outputs(metafile, self.resolver.base()) {
            tracing::debug!("collected stylesheet {}", css.display());
            collector(&css);
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown error".to_string()
    }
}
