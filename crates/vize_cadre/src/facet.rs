//! Facet loading.
//!
//! Each request re-reads and re-parses its physical file (or hits the
//! descriptor cache), then asks the compiler for exactly the facet it
//! addresses. Failures come back as [`CadreError`]; turning them into host
//! diagnostics is the plugin's job.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use vize_carton::hash::synthesis_id;
use vize_carton::path::{relative, to_slash_string};

use crate::cache::DescriptorCache;
use crate::compiler::{
    join_messages, ParseOptions, ScriptCompileOptions, SfcCompiler, StyleCompileOptions,
    TemplateCompileOptions,
};
use crate::descriptor::SfcDescriptor;
use crate::error::{CadreError, CadreResult};
use crate::host::{Loader, OnLoadOutput};
use crate::identity::{ComponentIdentity, Facet};
use crate::options::VuePluginOptions;
use crate::synthesize::{scope_id, synthesize, ComponentPlan};

/// Compiles the facets of components on behalf of the plugin.
#[derive(Debug)]
pub struct FacetCompiler<C> {
    compiler: C,
    options: VuePluginOptions,
    base: PathBuf,
    source_map: bool,
    cache: Option<DescriptorCache>,
}

impl<C: SfcCompiler> FacetCompiler<C> {
    pub fn new(compiler: C, options: VuePluginOptions, base: PathBuf, source_map: bool) -> Self {
        let cache = options.cache_descriptors.then(DescriptorCache::new);
        Self {
            compiler,
            options,
            base,
            source_map,
            cache,
        }
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    pub fn options(&self) -> &VuePluginOptions {
        &self.options
    }

    pub fn source_map(&self) -> bool {
        self.source_map
    }

    /// Component id derived from the path relative to the resolution base.
    pub fn synthesis_id(&self, path: &Path) -> String {
        synthesis_id(&to_slash_string(&relative(&self.base, path)))
    }

    /// Load the facet `identity` addresses. `Ok(None)` means the facet has no module.
    pub async fn load(
        &self,
        identity: &ComponentIdentity,
        resolve_dir: Option<&Path>,
    ) -> CadreResult<Option<OnLoadOutput>> {
        tracing::debug!("load {} facet of {}", identity.facet, identity.path.display());

        let descriptor = self.read_descriptor(&identity.path).await?;
        let id = self.synthesis_id(&identity.path);

        let loaded = match identity.facet {
            Facet::WholeFile => Some(self.load_component(identity, &descriptor, &id)?),
            Facet::Template => self.load_template(&identity.path, &descriptor, &id)?,
            Facet::Script => self.load_script(&descriptor, &id)?,
            Facet::Style => Some(self.load_style(&identity.path, &descriptor, &id).await?),
        };

        Ok(loaded.map(|(contents, loader)| OnLoadOutput {
            contents,
            resolve_dir: resolve_dir
                .filter(|dir| !dir.as_os_str().is_empty())
                .map_or_else(|| self.base.clone(), Path::to_path_buf),
            loader,
            watch_files: vec![identity.path.clone()],
        }))
    }

    async fn read_descriptor(&self, path: &Path) -> CadreResult<Arc<SfcDescriptor>> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CadreError::from_io(path.to_path_buf(), e))?;

        if let Some(descriptor) = self
            .cache
            .as_ref()
            .and_then(|cache| cache.get(path, &source, self.source_map))
        {
            tracing::trace!("descriptor cache hit for {}", path.display());
            return Ok(descriptor);
        }

        let parsed = self.compiler.parse(
            &source,
            &ParseOptions {
                filename: to_slash_string(path),
                source_map: self.source_map,
            },
        );
        if !parsed.errors.is_empty() {
            return Err(CadreError::Parse(join_messages(&parsed.errors)));
        }

        let descriptor = Arc::new(parsed.descriptor);
        if let Some(cache) = &self.cache {
            cache.insert(path, &source, self.source_map, Arc::clone(&descriptor));
        }
        Ok(descriptor)
    }

    fn load_component(
        &self,
        identity: &ComponentIdentity,
        descriptor: &SfcDescriptor,
        id: &str,
    ) -> CadreResult<(String, Loader)> {
        let plan = ComponentPlan::new(descriptor, identity, id);

        let compiled = if plan.has_script {
            let script = self
                .compiler
                .compile_script(
                    descriptor,
                    &ScriptCompileOptions {
                        id: id.to_string(),
                        inline_template: plan.inline_template,
                        source_map: self.source_map,
                    },
                )
                .map_err(|e| CadreError::Compile {
                    facet: Facet::Script,
                    block: None,
                    message: e.as_str().to_string(),
                })?;
            Some(script.content)
        } else {
            None
        };

        let code = synthesize(&self.compiler, &plan, compiled.as_deref()).map_err(|e| {
            CadreError::Compile {
                facet: Facet::Script,
                block: None,
                message: e.as_str().to_string(),
            }
        })?;
        tracing::trace!("synthesized {} bytes for {}", code.len(), identity.path.display());

        let loader = if plan.is_typescript {
            Loader::Ts
        } else {
            Loader::Js
        };
        Ok((code, loader))
    }

    fn load_template(
        &self,
        path: &Path,
        descriptor: &SfcDescriptor,
        id: &str,
    ) -> CadreResult<Option<(String, Loader)>> {
        let Some(template) = &descriptor.template else {
            return Ok(None);
        };
        let scoped = descriptor.has_scoped_style();

        let mut expression_plugins = Vec::new();
        if descriptor
            .script_lang()
            .is_some_and(|lang| lang.ends_with("ts") || lang.ends_with("tsx"))
        {
            expression_plugins.push(Value::from("typescript"));
        }

        let mut compiler_options = Map::new();
        if scoped {
            compiler_options.insert("scopeId".into(), Value::from(scope_id(id)));
        }
        compiler_options.insert("sourceMap".into(), Value::from(self.source_map));
        compiler_options.insert("expressionPlugins".into(), Value::Array(expression_plugins));
        for (key, value) in &self.options.template.compiler_options {
            compiler_options.insert(key.clone(), value.clone());
        }

        let compiled = self.compiler.compile_template(&TemplateCompileOptions {
            source: template.content.clone(),
            filename: path.to_path_buf(),
            id: id.to_string(),
            scoped,
            is_prod: self.options.is_production(),
            slotted: descriptor.slotted,
            preprocess_lang: template.lang.clone(),
            compiler_options,
        });

        if !compiled.errors.is_empty() {
            return Err(CadreError::Compile {
                facet: Facet::Template,
                block: None,
                message: join_messages(&compiled.errors),
            });
        }
        Ok(Some((compiled.code, Loader::Js)))
    }

    fn load_script(
        &self,
        descriptor: &SfcDescriptor,
        id: &str,
    ) -> CadreResult<Option<(String, Loader)>> {
        if descriptor.script.is_none() {
            return Ok(None);
        }

        let compiled = self
            .compiler
            .compile_script(
                descriptor,
                &ScriptCompileOptions {
                    id: id.to_string(),
                    inline_template: false,
                    source_map: self.source_map,
                },
            )
            .map_err(|e| CadreError::Compile {
                facet: Facet::Script,
                block: None,
                message: e.as_str().to_string(),
            })?;

        let loader = if compiled.lang.as_deref() == Some("ts") {
            Loader::Ts
        } else {
            Loader::Js
        };
        Ok(Some((compiled.content, loader)))
    }

    async fn load_style(
        &self,
        path: &Path,
        descriptor: &SfcDescriptor,
        id: &str,
    ) -> CadreResult<(String, Loader)> {
        let mut css = String::new();

        // Blocks compile one at a time so the output keeps declaration order.
        for (index, style) in descriptor.styles.iter().enumerate() {
            let compiled = self
                .compiler
                .compile_style(&StyleCompileOptions {
                    source: style.content.clone(),
                    filename: path.to_path_buf(),
                    id: id.to_string(),
                    scoped: style.scoped,
                    preprocess_lang: style
                        .lang
                        .clone()
                        .or_else(|| self.options.style.preprocess_lang.clone()),
                    modules: style.module.is_some(),
                })
                .await;

            if !compiled.errors.is_empty() {
                return Err(CadreError::Compile {
                    facet: Facet::Style,
                    block: Some(index + 1),
                    message: join_messages(&compiled.errors),
                });
            }
            css.push_str(&compiled.code);
        }

        Ok((css, Loader::Css))
    }
}
