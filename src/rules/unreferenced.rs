//! Unreferenced code detection: files nothing else imports.

use crate::grammar::Rule;
use crate::rules::RuleContext;
use crate::types::{RoleReference, Violation};
use regex::Regex;
use std::collections::HashSet;

pub(crate) fn evaluate(
    rule: &Rule,
    scope: &RoleReference,
    ignore: &[Regex],
    ctx: &RuleContext,
) -> Vec<Violation> {
    // Reverse-dependency set over every symbol, not just the scoped ones:
    // a reference from any role keeps a file alive.
    let mut referenced: HashSet<&str> = HashSet::new();
    for symbol in ctx.symbols {
        for dep in &symbol.dependencies {
            if dep != &symbol.path {
                referenced.insert(dep.as_str());
            }
        }
    }

    ctx.files_in_scope(scope)
        .into_iter()
        .filter(|(path, _)| !referenced.contains(path))
        .filter(|(path, _)| !ignore.iter().any(|pattern| pattern.is_match(path)))
        .map(|(path, role)| {
            Violation::new(
                &rule.name,
                rule.severity,
                path,
                format!("'{path}' is not referenced by any other file"),
            )
            .with_from_role(role)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{Fixture, rule, run};
    use crate::symbol::{Symbol, SymbolKind};

    fn symbol(path: &str, deps: &[&str]) -> Symbol {
        Symbol::new(path, "x", SymbolKind::File)
            .with_dependencies(deps.iter().map(|d| d.to_string()))
            .with_role("ANY")
    }

    #[test]
    fn test_orphan_reported_entrypoint_ignored() {
        let fixture = Fixture::new(vec![
            symbol("main.ts", &["app.ts"]),
            symbol("app.ts", &[]),
            symbol("orphan.ts", &[]),
        ]);
        let ignore = vec![Regex::new(r"^main\.ts$").unwrap()];
        let violations = run(&fixture, |ctx| {
            evaluate(&rule("dead-code"), &RoleReference::All, &ignore, ctx)
        });

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].file, "orphan.ts");
    }

    #[test]
    fn test_self_import_does_not_count_as_reference() {
        let fixture = Fixture::new(vec![symbol("loner.ts", &["loner.ts"])]);
        let violations = run(&fixture, |ctx| {
            evaluate(&rule("dead-code"), &RoleReference::All, &[], ctx)
        });

        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_referenced_files_not_reported() {
        let fixture = Fixture::new(vec![symbol("a.ts", &["b.ts"]), symbol("b.ts", &[])]);
        let violations = run(&fixture, |ctx| {
            evaluate(&rule("dead-code"), &RoleReference::All, &[], ctx)
        });

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].file, "a.ts");
    }
}
