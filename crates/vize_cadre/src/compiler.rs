//! The SFC compiler collaborator.
//!
//! Turning template syntax into render functions, transforming `<script setup>`
//! and processing styles all belong to the compiler behind [`SfcCompiler`].
//! The plugin only decides *what* to ask for and how to wire the answers
//! together.

use std::future::Future;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::descriptor::{parse_descriptor, SfcDescriptor};

/// A compiler diagnostic: either a structured entry or a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompilerMessage {
    Text(String),
    Structured {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
}

impl CompilerMessage {
    pub fn text(message: impl Into<String>) -> Self {
        CompilerMessage::Text(message.into())
    }

    /// The human readable text, regardless of shape.
    pub fn as_str(&self) -> &str {
        match self {
            CompilerMessage::Text(text) => text,
            CompilerMessage::Structured { message, .. } => message,
        }
    }
}

/// Join diagnostic texts the way they are reported to the host.
pub fn join_messages(messages: &[CompilerMessage]) -> String {
    messages
        .iter()
        .map(CompilerMessage::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Options for [`SfcCompiler::parse`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub filename: String,
    pub source_map: bool,
}

/// Result of [`SfcCompiler::parse`].
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub descriptor: SfcDescriptor,
    pub errors: Vec<CompilerMessage>,
}

/// Options for [`SfcCompiler::compile_script`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptCompileOptions {
    /// Component synthesis id.
    pub id: String,
    /// Compile the template into the setup function.
    pub inline_template: bool,
    pub source_map: bool,
}

/// Result of [`SfcCompiler::compile_script`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledScript {
    pub content: String,
    /// Output language (`"ts"` or `"js"`).
    pub lang: Option<String>,
}

/// Syntax extensions the default-export rewrite must understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptDialect {
    TypeScript,
    Jsx,
}

impl ScriptDialect {
    /// Dialects implied by a script `lang` attribute.
    pub fn for_lang(lang: Option<&str>) -> &'static [ScriptDialect] {
        match lang {
            Some("ts") => &[ScriptDialect::TypeScript],
            Some("tsx") => &[ScriptDialect::TypeScript, ScriptDialect::Jsx],
            Some("jsx") => &[ScriptDialect::Jsx],
            _ => &[],
        }
    }
}

/// Options for [`SfcCompiler::compile_template`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateCompileOptions {
    pub source: String,
    pub filename: PathBuf,
    pub id: String,
    pub scoped: bool,
    pub is_prod: bool,
    pub slotted: bool,
    pub preprocess_lang: Option<String>,
    /// `scopeId`, `sourceMap`, `expressionPlugins` and user overrides.
    pub compiler_options: serde_json::Map<String, serde_json::Value>,
}

/// Result of [`SfcCompiler::compile_template`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledTemplate {
    pub code: String,
    pub errors: Vec<CompilerMessage>,
}

/// Options for [`SfcCompiler::compile_style`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleCompileOptions {
    pub source: String,
    pub filename: PathBuf,
    pub id: String,
    pub scoped: bool,
    pub preprocess_lang: Option<String>,
    /// Whether the block is a CSS module.
    pub modules: bool,
}

/// Result of [`SfcCompiler::compile_style`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledStyle {
    pub code: String,
    pub errors: Vec<CompilerMessage>,
}

/// The SFC compiler the plugin delegates to.
///
/// `parse` and `rewrite_default` have built-in implementations; the three
/// `compile_*` calls must be provided.
pub trait SfcCompiler: Send + Sync {
    /// Split a `.vue` source into its descriptor.
    fn parse(&self, source: &str, options: &ParseOptions) -> ParseOutput {
        parse_descriptor(source, options)
    }

    /// Compile `<script>` / `<script setup>` into a module with a default export.
    fn compile_script(
        &self,
        descriptor: &SfcDescriptor,
        options: &ScriptCompileOptions,
    ) -> Result<CompiledScript, CompilerMessage>;

    /// Rebind the default export of `code` to a local named `as_name`.
    ///
    /// Fails when `code` does not parse under `dialects`.
    fn rewrite_default(
        &self,
        code: &str,
        as_name: &str,
        dialects: &[ScriptDialect],
    ) -> Result<String, CompilerMessage> {
        crate::rewrite_default::rewrite_default(code, as_name, dialects)
            .map(|(code, _)| code)
            .map_err(CompilerMessage::Text)
    }

    /// Compile the template into a module exporting `render`.
    fn compile_template(&self, options: &TemplateCompileOptions) -> CompiledTemplate;

    /// Compile one style block.
    fn compile_style(
        &self,
        options: &StyleCompileOptions,
    ) -> impl Future<Output = CompiledStyle> + Send;
}
