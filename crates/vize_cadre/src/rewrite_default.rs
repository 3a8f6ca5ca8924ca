//! Rewrite a module's default export into a local binding.
//!
//! `export default { ... }` becomes `const __sfc_main = { ... }` so the
//! synthesized component module can attach `render` and `__scopeId` to it
//! before exporting it again.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ExportDefaultDeclarationKind, ExportNamedDeclaration, ExportSpecifier, ModuleExportName,
    Statement,
};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};

use crate::compiler::ScriptDialect;

/// Local name the default export is re-bound to when re-exported from a source.
const REEXPORTED_DEFAULT: &str = "__VUE_DEFAULT__";

/// Rewrite `export default` to a const declaration named `as_name`.
///
/// Returns `(rewritten_code, had_default_export)`. Without a default export
/// an empty object is bound instead. Unparsable input is an error carrying the
/// parser's messages.
pub fn rewrite_default(
    input: &str,
    as_name: &str,
    dialects: &[ScriptDialect],
) -> Result<(String, bool), String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, input, source_type(dialects)).parse();

    if !ret.errors.is_empty() {
        let messages: Vec<String> = ret.errors.iter().map(|e| e.to_string()).collect();
        return Err(messages.join(", "));
    }

    let mut output = String::with_capacity(input.len() + 32);
    let mut last_end = 0;
    let mut found = false;

    for stmt in ret.program.body.iter() {
        match stmt {
            Statement::ExportDefaultDeclaration(decl) => {
                output.push_str(&input[last_end..decl.span.start as usize]);
                let end = decl.span.end as usize;

                let named = match &decl.declaration {
                    ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                        class.id.as_ref().map(|id| (id.name.as_str(), class.span.start))
                    }
                    ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                        func.id.as_ref().map(|id| (id.name.as_str(), func.span.start))
                    }
                    _ => None,
                };

                match named {
                    // export default class Foo {} -> class Foo {}\nconst as_name = Foo
                    Some((name, start)) => {
                        output.push_str(&input[start as usize..end]);
                        output.push_str(&format!("\nconst {as_name} = {name}"));
                    }
                    // export default <expr> -> const as_name = <expr>
                    None => {
                        let start = decl.declaration.span().start as usize;
                        output.push_str(&format!("const {as_name} = "));
                        output.push_str(&input[start..end]);
                    }
                }

                last_end = end;
                found = true;
            }
            Statement::ExportNamedDeclaration(named) if has_default_specifier(named) => {
                output.push_str(&input[last_end..named.span.start as usize]);
                rewrite_named_default(&mut output, named, as_name);
                last_end = named.span.end as usize;
                found = true;
            }
            _ => {}
        }
    }

    if !found {
        let mut output = input.to_string();
        output.push_str(&format!("\nconst {as_name} = {{}}"));
        return Ok((output, false));
    }

    output.push_str(&input[last_end..]);
    Ok((output, true))
}

fn source_type(dialects: &[ScriptDialect]) -> SourceType {
    let ts = dialects.contains(&ScriptDialect::TypeScript);
    let jsx = dialects.contains(&ScriptDialect::Jsx);
    match (ts, jsx) {
        (true, true) => SourceType::tsx(),
        (true, false) => SourceType::ts(),
        (false, true) => SourceType::jsx(),
        (false, false) => SourceType::mjs(),
    }
}

/// `export { a as default }` and `export { default } from './x'`.
fn rewrite_named_default(output: &mut String, named: &ExportNamedDeclaration<'_>, as_name: &str) {
    let Some(default_spec) = named.specifiers.iter().find(|s| is_default(s)) else {
        return;
    };
    let local = export_name(&default_spec.local);
    let source = named.source.as_ref().map(|s| s.value.as_str());

    if let Some(source) = source {
        output.push_str(&format!(
            "import {{ {local} as {REEXPORTED_DEFAULT} }} from '{source}'\n"
        ));
    }

    let others: Vec<String> = named
        .specifiers
        .iter()
        .filter(|s| !is_default(s))
        .map(|s| {
            let (local, exported) = (export_name(&s.local), export_name(&s.exported));
            if local == exported {
                local.to_string()
            } else {
                format!("{local} as {exported}")
            }
        })
        .collect();

    if !others.is_empty() {
        output.push_str(&format!("export {{ {} }}", others.join(", ")));
        if let Some(source) = source {
            output.push_str(&format!(" from '{source}'"));
        }
        output.push('\n');
    }

    match source {
        Some(_) => output.push_str(&format!("const {as_name} = {REEXPORTED_DEFAULT}")),
        None => output.push_str(&format!("const {as_name} = {local}")),
    }
}

fn has_default_specifier(named: &ExportNamedDeclaration<'_>) -> bool {
    named.specifiers.iter().any(is_default)
}

fn is_default(spec: &ExportSpecifier<'_>) -> bool {
    export_name(&spec.exported) == "default"
}

fn export_name<'a>(name: &'a ModuleExportName<'_>) -> &'a str {
    match name {
        ModuleExportName::IdentifierName(id) => id.name.as_str(),
        ModuleExportName::IdentifierReference(id) => id.name.as_str(),
        ModuleExportName::StringLiteral(lit) => lit.value.as_str(),
    }
}
