//! Component module synthesis.
//!
//! The module served for `Foo.vue` itself: the compiled script bound to a
//! local, side-effect imports of the style facet, the template facet's
//! `render` when it was not inlined, the scope id, and the default export.
//! Each facet stays its own module so the host caches and splits it
//! independently.

use crate::compiler::{CompilerMessage, ScriptDialect, SfcCompiler};
use crate::descriptor::SfcDescriptor;
use crate::identity::{ComponentIdentity, Facet};

/// Local binding the component object lives in.
pub const COMPONENT_LOCAL: &str = "__sfc_main";

/// Prefix of scope attributes (`data-v-<id>`).
pub const SCOPE_ID_PREFIX: &str = "data-v-";

/// Scope attribute for a synthesis id.
pub fn scope_id(id: &str) -> String {
    format!("{SCOPE_ID_PREFIX}{id}")
}

/// What the synthesized module has to wire together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPlan {
    /// Module id of the style facet.
    pub style_specifier: String,
    /// Module id of the template facet.
    pub template_specifier: String,
    pub id: String,
    /// `lang` of the script setup block, else of the plain script block.
    pub script_lang: Option<String>,
    pub is_typescript: bool,
    pub has_script: bool,
    pub has_template: bool,
    pub inline_template: bool,
    pub has_styles: bool,
    pub has_scoped_style: bool,
}

impl ComponentPlan {
    pub fn new(descriptor: &SfcDescriptor, identity: &ComponentIdentity, id: &str) -> Self {
        Self {
            style_specifier: identity.facet_specifier(Facet::Style),
            template_specifier: identity.facet_specifier(Facet::Template),
            id: id.to_string(),
            script_lang: descriptor.script_lang().map(str::to_string),
            is_typescript: descriptor.is_typescript(),
            has_script: descriptor.has_script(),
            has_template: descriptor.template.is_some(),
            inline_template: descriptor.inline_template(),
            has_styles: !descriptor.styles.is_empty(),
            has_scoped_style: descriptor.has_scoped_style(),
        }
    }

    /// Dialects the default-export rewrite must accept.
    pub fn dialects(&self) -> &'static [ScriptDialect] {
        match ScriptDialect::for_lang(self.script_lang.as_deref()) {
            [] if self.is_typescript => ScriptDialect::for_lang(Some("ts")),
            dialects => dialects,
        }
    }
}

/// Emit the component module.
///
/// `compiled_script` is the script compiler's output and is only consulted
/// when the plan has a script. Fails when the script cannot be rewritten.
pub fn synthesize<C: SfcCompiler>(
    compiler: &C,
    plan: &ComponentPlan,
    compiled_script: Option<&str>,
) -> Result<String, CompilerMessage> {
    let mut code = String::new();

    match compiled_script.filter(|_| plan.has_script) {
        Some(script) => {
            code.push_str(&compiler.rewrite_default(script, COMPONENT_LOCAL, plan.dialects())?);
        }
        None => {
            code.push_str("let ");
            code.push_str(COMPONENT_LOCAL);
            code.push_str(" = {}");
        }
    }

    if plan.has_styles {
        code.push_str(&format!("\nimport \"{}\"\n", plan.style_specifier));
    }

    if plan.has_template && !plan.inline_template {
        code.push_str(&format!(
            "\nimport {{ render }} from \"{}\"\n\n{COMPONENT_LOCAL}.render = render\n",
            plan.template_specifier
        ));
    }

    if plan.has_scoped_style {
        code.push_str(&format!(
            "{COMPONENT_LOCAL}.__scopeId = \"{}\"\n",
            scope_id(&plan.id)
        ));
    }

    code.push_str(&format!("\nexport default {COMPONENT_LOCAL}"));
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{
        CompiledScript, CompiledStyle, CompiledTemplate, CompilerMessage, ScriptCompileOptions,
        StyleCompileOptions, TemplateCompileOptions,
    };
    use std::future::Future;

    /// Only the built-in `rewrite_default` is exercised here.
    struct RewriteOnly;

    impl SfcCompiler for RewriteOnly {
        fn compile_script(
            &self,
            _: &SfcDescriptor,
            _: &ScriptCompileOptions,
        ) -> Result<CompiledScript, CompilerMessage> {
            unreachable!()
        }

        fn compile_template(&self, _: &TemplateCompileOptions) -> CompiledTemplate {
            unreachable!()
        }

        fn compile_style(
            &self,
            _: &StyleCompileOptions,
        ) -> impl Future<Output = CompiledStyle> + Send {
            std::future::ready(CompiledStyle::default())
        }
    }

    fn plan() -> ComponentPlan {
        ComponentPlan {
            style_specifier: "/p/src/Foo.vue?vue&type=style".into(),
            template_specifier: "/p/src/Foo.vue?vue&type=template".into(),
            id: "a3dd06a1".into(),
            script_lang: None,
            is_typescript: false,
            has_script: true,
            has_template: true,
            inline_template: false,
            has_styles: true,
            has_scoped_style: true,
        }
    }

    #[test]
    fn test_full_component() {
        let code = synthesize(&RewriteOnly, &plan(), Some("export default { name: 'Foo' }")).unwrap();
        insta::assert_snapshot!(code, @r###"
        const __sfc_main = { name: 'Foo' }
        import "/p/src/Foo.vue?vue&type=style"

        import { render } from "/p/src/Foo.vue?vue&type=template"

        __sfc_main.render = render
        __sfc_main.__scopeId = "data-v-a3dd06a1"

        export default __sfc_main
        "###);
    }

    #[test]
    fn test_template_only_component() {
        let plan = ComponentPlan {
            has_script: false,
            has_styles: false,
            has_scoped_style: false,
            ..plan()
        };
        let code = synthesize(&RewriteOnly, &plan, None).unwrap();
        assert_eq!(
            code,
            "let __sfc_main = {}\nimport { render } from \"/p/src/Foo.vue?vue&type=template\"\n\n__sfc_main.render = render\n\nexport default __sfc_main"
        );
    }

    #[test]
    fn test_inlined_template_is_not_imported() {
        let plan = ComponentPlan {
            inline_template: true,
            ..plan()
        };
        let code = synthesize(&RewriteOnly, &plan, Some("export default {}")).unwrap();
        assert!(!code.contains("?vue&type=template"));
        assert!(code.contains("import \"/p/src/Foo.vue?vue&type=style\""));
        assert!(code.ends_with("\nexport default __sfc_main"));
    }

    #[test]
    fn test_typescript_script_uses_ts_dialect() {
        let plan = ComponentPlan {
            is_typescript: true,
            has_styles: false,
            has_scoped_style: false,
            has_template: false,
            ..plan()
        };
        let script = "const n: number = 1\nexport default { n }";
        let code = synthesize(&RewriteOnly, &plan, Some(script)).unwrap();
        assert_eq!(
            code,
            "const n: number = 1\nconst __sfc_main = { n }\nexport default __sfc_main"
        );
    }

    #[test]
    fn test_tsx_script_uses_jsx_dialect() {
        let plan = ComponentPlan {
            script_lang: Some("tsx".into()),
            has_styles: false,
            has_scoped_style: false,
            has_template: false,
            ..plan()
        };
        assert_eq!(
            plan.dialects(),
            &[ScriptDialect::TypeScript, ScriptDialect::Jsx]
        );
        let code =
            synthesize(&RewriteOnly, &plan, Some("export default { render: () => <p/> }")).unwrap();
        assert_eq!(
            code,
            "const __sfc_main = { render: () => <p/> }\nexport default __sfc_main"
        );
    }

    #[test]
    fn test_unparsable_script_is_an_error() {
        let plan = ComponentPlan {
            has_styles: false,
            has_scoped_style: false,
            ..plan()
        };
        let err = synthesize(&RewriteOnly, &plan, Some("export default { render: () => <p/> }"))
            .unwrap_err();
        assert!(!err.as_str().is_empty());
    }

    #[test]
    fn test_scope_id() {
        assert_eq!(scope_id("0123abcd"), "data-v-0123abcd");
    }
}
