//! Documentation rule: files over a size threshold need a doc header
//! before their first top-level declaration.

use crate::grammar::Rule;
use crate::rules::{RuleContext, line_count};
use crate::types::{RoleReference, Violation};
use regex::Regex;
use std::sync::LazyLock;

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?(?:async\s+)?(?:class|interface|function|const|let|var|type|enum|namespace)\b",
    )
    .expect("declaration regex")
});

pub(crate) fn evaluate(
    rule: &Rule,
    scope: &RoleReference,
    min_lines: usize,
    requires_jsdoc: bool,
    ctx: &RuleContext,
) -> Vec<Violation> {
    if !requires_jsdoc {
        return Vec::new();
    }

    ctx.files_in_scope(scope)
        .into_iter()
        .filter_map(|(path, role)| {
            let content = ctx.cache.get(path)?;
            if line_count(content) < min_lines {
                return None;
            }
            (!has_doc_header(content)).then(|| {
                Violation::new(
                    &rule.name,
                    rule.severity,
                    path,
                    format!(
                        "'{path}' has {} lines but no doc comment before its first declaration",
                        line_count(content)
                    ),
                )
                .with_from_role(role)
            })
        })
        .collect()
}

/// Whether a `/** ... */` block appears before the first top-level
/// declaration. Imports and line comments may precede either.
fn has_doc_header(content: &str) -> bool {
    let mut in_block = false;
    for line in content.lines() {
        let trimmed = line.trim();
        if in_block {
            if trimmed.contains("*/") {
                in_block = false;
            }
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with("//") || trimmed.starts_with("import ") {
            continue;
        }
        if trimmed.starts_with("/**") {
            return true;
        }
        if trimmed.starts_with("/*") {
            in_block = !trimmed.contains("*/");
            continue;
        }
        if DECLARATION.is_match(trimmed) {
            return false;
        }
    }
    // Nothing declared at all: nothing to document.
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{Fixture, rule, run};
    use crate::symbol::{Symbol, SymbolKind};

    fn fixture(content: &str) -> Fixture {
        Fixture::new(vec![
            Symbol::new("src/a.ts", "a", SymbolKind::Class).with_role("ANY"),
        ])
        .with_content("src/a.ts", content)
    }

    #[test]
    fn test_documented_file_passes() {
        let content = "import { x } from './x';\n\n/**\n * The thing.\n */\nexport class A {}\n";
        let violations = run(&fixture(content), |ctx| {
            evaluate(&rule("docs"), &RoleReference::All, 1, true, ctx)
        });
        assert!(violations.is_empty());
    }

    #[test]
    fn test_undocumented_file_reported() {
        let content = "import { x } from './x';\nexport class A {}\n// late comment\n";
        let violations = run(&fixture(content), |ctx| {
            evaluate(&rule("docs"), &RoleReference::All, 1, true, ctx)
        });
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].file, "src/a.ts");
    }

    #[test]
    fn test_short_files_exempt() {
        let content = "export class A {}\n";
        let violations = run(&fixture(content), |ctx| {
            evaluate(&rule("docs"), &RoleReference::All, 50, true, ctx)
        });
        assert!(violations.is_empty());
    }

    #[test]
    fn test_requires_jsdoc_false_disables_rule() {
        let content = "export class A {}\n";
        let violations = run(&fixture(content), |ctx| {
            evaluate(&rule("docs"), &RoleReference::All, 1, false, ctx)
        });
        assert!(violations.is_empty());
    }

    #[test]
    fn test_plain_block_comment_is_not_a_doc_header() {
        let content = "/* not jsdoc */\nexport class A {}\n";
        let violations = run(&fixture(content), |ctx| {
            evaluate(&rule("docs"), &RoleReference::All, 1, true, ctx)
        });
        assert_eq!(violations.len(), 1);
    }
}
