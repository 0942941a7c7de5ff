//! Default TypeScript parser built on tree-sitter.
//!
//! Walks the top level of each source file: exported declarations become
//! symbols, import and re-export specifiers become dependency candidates.
//! Relative specifiers are resolved against the enumerated project set with
//! the usual extension and index probing; package imports are dropped. A
//! file exporting nothing the model tracks yields a single file-level
//! symbol, so every file participates in the dependency graph.

use crate::config::Settings;
use crate::error::{AnalyzeError, AnalyzeResult};
use crate::parsing::parser::CodeParser;
use crate::parsing::walker::FileWalker;
use crate::symbol::{Symbol, SymbolKind, file_stem};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::Arc;
use tree_sitter::{Language, Node, Parser};

/// Extensions probed when a specifier has none, in resolution order.
const RESOLVE_EXTENSIONS: [&str; 4] = ["ts", "tsx", "js", "jsx"];

pub struct TypeScriptParser {
    ts: Parser,
    tsx: Parser,
    walker: FileWalker,
}

/// What one file contributed before dependency resolution.
#[derive(Debug, Default)]
struct FileOutline {
    exports: Vec<(String, SymbolKind)>,
    specifiers: Vec<String>,
}

impl TypeScriptParser {
    pub fn new(settings: Arc<Settings>) -> AnalyzeResult<Self> {
        let init = |language: Language| -> AnalyzeResult<Parser> {
            let mut parser = Parser::new();
            parser
                .set_language(&language)
                .map_err(|e| AnalyzeError::ParserInit {
                    language: "TypeScript".to_string(),
                    reason: e.to_string(),
                })?;
            Ok(parser)
        };

        Ok(Self {
            ts: init(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())?,
            tsx: init(tree_sitter_typescript::LANGUAGE_TSX.into())?,
            walker: FileWalker::new(settings),
        })
    }

    fn outline(&mut self, path: &str, code: &str) -> FileOutline {
        let parser = if path.ends_with(".tsx") {
            &mut self.tsx
        } else {
            &mut self.ts
        };

        let Some(tree) = parser.parse(code, None) else {
            tracing::debug!("tree-sitter produced no tree for {path}; treating as opaque file");
            return FileOutline::default();
        };

        let mut outline = FileOutline::default();
        // Names exported via `export { A, B }` without a source, matched
        // against top-level declarations afterwards.
        let mut clause_exports: Vec<String> = Vec::new();
        let mut declared: Vec<(String, SymbolKind)> = Vec::new();

        let root = tree.root_node();
        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "import_statement" => {
                    if let Some(spec) = source_specifier(node, code) {
                        outline.specifiers.push(spec);
                    }
                }
                "export_statement" => {
                    if let Some(spec) = source_specifier(node, code) {
                        // Re-export: a dependency, but no locally named symbol.
                        outline.specifiers.push(spec);
                        continue;
                    }
                    if let Some(declaration) = node.child_by_field_name("declaration") {
                        collect_declaration(declaration, code, path, &mut outline.exports);
                        continue;
                    }
                    // `export default <expr>`: only identifiers re-export a
                    // local declaration by name.
                    if let Some(value) = node.child_by_field_name("value") {
                        if value.kind() == "identifier" {
                            clause_exports.push(text(value, code).to_string());
                        }
                        continue;
                    }
                    collect_export_clause(node, code, &mut clause_exports);
                }
                _ => {
                    collect_declaration(node, code, path, &mut declared);
                }
            }
        }

        for name in clause_exports {
            if let Some((name, kind)) = declared.iter().find(|(n, _)| *n == name).cloned() {
                if !outline.exports.iter().any(|(n, _)| *n == name) {
                    outline.exports.push((name, kind));
                }
            }
        }

        outline
    }
}

impl CodeParser for TypeScriptParser {
    fn parse(&mut self, project_root: &Path) -> AnalyzeResult<Vec<Symbol>> {
        let files = self.walker.list(project_root);
        let file_set: HashSet<&str> = files.iter().map(String::as_str).collect();

        let mut symbols = Vec::new();
        for path in &files {
            let absolute = project_root.join(path);
            let code =
                std::fs::read_to_string(&absolute).map_err(|source| AnalyzeError::FileRead {
                    path: absolute.clone(),
                    source,
                })?;

            let outline = self.outline(path, &code);
            let dependencies: BTreeSet<String> = outline
                .specifiers
                .iter()
                .filter_map(|spec| resolve_specifier(path, spec, &file_set))
                .collect();

            if outline.exports.is_empty() {
                symbols.push(Symbol::for_file(path).with_dependencies(dependencies));
            } else {
                for (name, kind) in outline.exports {
                    symbols.push(
                        Symbol::new(path, name, kind).with_dependencies(dependencies.clone()),
                    );
                }
            }
        }

        tracing::debug!(
            files = files.len(),
            symbols = symbols.len(),
            "parsed project at {}",
            project_root.display()
        );
        Ok(symbols)
    }
}

fn text<'a>(node: Node, code: &'a str) -> &'a str {
    &code[node.byte_range()]
}

/// The module specifier of an import/export statement's `source` field,
/// unquoted. None when the statement has no source.
fn source_specifier(node: Node, code: &str) -> Option<String> {
    let source = node.child_by_field_name("source")?;
    let raw = text(source, code);
    Some(raw.trim_matches(['"', '\'', '`']).to_string())
}

/// Record a top-level declaration node as a (name, kind) pair. Non-tracked
/// node kinds are ignored. Anonymous default-exported declarations are
/// named after the file stem.
fn collect_declaration(node: Node, code: &str, path: &str, out: &mut Vec<(String, SymbolKind)>) {
    let kind = match node.kind() {
        "class_declaration" | "abstract_class_declaration" => SymbolKind::Class,
        "interface_declaration" => SymbolKind::Interface,
        "function_declaration" | "generator_function_declaration" => SymbolKind::Function,
        "type_alias_declaration" => SymbolKind::Type,
        "enum_declaration" => SymbolKind::Type,
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = node.walk();
            for declarator in node.named_children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                let function_valued = declarator.child_by_field_name("value").is_some_and(|v| {
                    matches!(
                        v.kind(),
                        "arrow_function" | "function_expression" | "generator_function"
                    )
                });
                if function_valued
                    && let Some(name) = declarator.child_by_field_name("name")
                {
                    out.push((text(name, code).to_string(), SymbolKind::Function));
                }
            }
            return;
        }
        _ => return,
    };

    let name = node
        .child_by_field_name("name")
        .map_or_else(|| file_stem(path).to_string(), |n| text(n, code).to_string());
    out.push((name, kind));
}

/// Names listed in an `export { A, B as C }` clause (original names, not
/// aliases; the alias is the outward name but the declaration is local).
fn collect_export_clause(node: Node, code: &str, out: &mut Vec<String>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "export_clause" {
            continue;
        }
        let mut spec_cursor = child.walk();
        for spec in child.named_children(&mut spec_cursor) {
            if spec.kind() == "export_specifier"
                && let Some(name) = spec.child_by_field_name("name")
            {
                out.push(text(name, code).to_string());
            }
        }
    }
}

/// Resolve a relative import specifier against the enumerated project set.
/// Returns the matched project path, or None for package imports and
/// imports that escape or miss the project.
fn resolve_specifier(from: &str, spec: &str, files: &HashSet<&str>) -> Option<String> {
    if !spec.starts_with("./") && !spec.starts_with("../") {
        return None;
    }

    let dir = match from.rfind('/') {
        Some(idx) => &from[..idx],
        None => "",
    };

    let mut segments: Vec<&str> = if dir.is_empty() {
        Vec::new()
    } else {
        dir.split('/').collect()
    };
    for segment in spec.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    let joined = segments.join("/");
    if joined.is_empty() {
        return None;
    }

    if files.contains(joined.as_str()) {
        return Some(joined);
    }
    for ext in RESOLVE_EXTENSIONS {
        let candidate = format!("{joined}.{ext}");
        if files.contains(candidate.as_str()) {
            return Some(candidate);
        }
    }
    for ext in RESOLVE_EXTENSIONS {
        let candidate = format!("{joined}/index.{ext}");
        if files.contains(candidate.as_str()) {
            return Some(candidate);
        }
    }
    None
}
