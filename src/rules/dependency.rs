//! Dependency rules: allowed / forbidden / required role edges, and cycle
//! detection over the role-filtered import graph.

use crate::analysis::graph::DependencyGraph;
use crate::grammar::{DependencyMode, DependencyTarget, Rule};
use crate::rules::RuleContext;
use crate::types::{RoleReference, UNKNOWN_ROLE, Violation};
use std::collections::{BTreeSet, HashMap, HashSet};

pub(crate) fn evaluate(
    rule: &Rule,
    mode: DependencyMode,
    from: &RoleReference,
    target: &DependencyTarget,
    ctx: &RuleContext,
) -> Vec<Violation> {
    match target {
        DependencyTarget::Circular => circular(rule, from, ctx),
        DependencyTarget::Roles(to) => role_edges(rule, mode, from, to, ctx),
    }
}

fn role_edges(
    rule: &Rule,
    mode: DependencyMode,
    from: &RoleReference,
    to: &RoleReference,
    ctx: &RuleContext,
) -> Vec<Violation> {
    let roles = ctx.role_by_path();
    let dependencies = file_dependencies(ctx);
    let mut violations = Vec::new();

    for (path, role) in ctx.files_in_scope(from) {
        let Some(deps) = dependencies.get(path) else {
            continue;
        };

        match mode {
            DependencyMode::Forbidden => {
                for dep in deps {
                    let Some(dep_role) = roles.get(dep) else {
                        continue;
                    };
                    if to.matches(dep_role) {
                        violations.push(
                            Violation::new(
                                &rule.name,
                                rule.severity,
                                path,
                                format!(
                                    "'{path}' ({role}) must not depend on '{dep}' ({dep_role})"
                                ),
                            )
                            .with_from_role(role)
                            .with_to_role(*dep_role)
                            .with_dependency(*dep),
                        );
                    }
                }
            }
            DependencyMode::Allowed => {
                for dep in deps {
                    let Some(dep_role) = roles.get(dep) else {
                        continue;
                    };
                    // UNKNOWN targets cannot be governed by role allowlists,
                    // and an edge within one role is not a cross-role edge.
                    if *dep_role == UNKNOWN_ROLE || *dep_role == role || to.matches(dep_role) {
                        continue;
                    }
                    violations.push(
                        Violation::new(
                            &rule.name,
                            rule.severity,
                            path,
                            format!(
                                "'{path}' ({role}) depends on '{dep}' ({dep_role}), \
                                 outside its allowed roles [{to}]"
                            ),
                        )
                        .with_from_role(role)
                        .with_to_role(*dep_role)
                        .with_dependency(*dep),
                    );
                }
            }
            DependencyMode::Required => {
                let satisfied = deps
                    .iter()
                    .any(|dep| roles.get(dep).is_some_and(|r| to.matches(r)));
                if !satisfied {
                    violations.push(
                        Violation::new(
                            &rule.name,
                            rule.severity,
                            path,
                            format!("'{path}' ({role}) has no dependency on role(s) [{to}]"),
                        )
                        .with_from_role(role),
                    );
                }
            }
        }
    }

    violations
}

/// One violation per cycle among files satisfying the `from` reference.
/// Only edges with both endpoints in scope count.
fn circular(rule: &Rule, from: &RoleReference, ctx: &RuleContext) -> Vec<Violation> {
    let in_scope = ctx.files_in_scope(from);
    let node_set: HashSet<&str> = in_scope.iter().map(|(path, _)| *path).collect();
    let dependencies = file_dependencies(ctx);

    let nodes = in_scope.iter().map(|(path, _)| *path);
    let edges = in_scope.iter().flat_map(|(path, _)| {
        dependencies
            .get(path)
            .into_iter()
            .flatten()
            .filter(|dep| node_set.contains(**dep))
            .map(move |dep| (*path, *dep))
    });
    let graph = DependencyGraph::build(nodes, edges);

    let role_of: HashMap<&str, &str> = in_scope.iter().copied().collect();
    graph
        .cycles()
        .iter()
        .map(|cycle| {
            let head = cycle[0];
            let mut trail = cycle.join(" -> ");
            trail.push_str(" -> ");
            trail.push_str(head);
            let mut violation = Violation::new(
                &rule.name,
                rule.severity,
                head,
                format!("Circular dependency detected: {trail}"),
            );
            if let Some(role) = role_of.get(head) {
                violation = violation.with_from_role(*role);
            }
            violation
        })
        .collect()
}

/// Union of dependency sets per file. Symbols of one file share their
/// dependency set by parser contract; the union guards against collaborators
/// that are looser about it.
fn file_dependencies<'a>(ctx: &'a RuleContext) -> HashMap<&'a str, BTreeSet<&'a str>> {
    let mut map: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for symbol in ctx.symbols {
        let entry = map.entry(symbol.path.as_str()).or_default();
        entry.extend(symbol.dependencies.iter().map(String::as_str));
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{Fixture, rule, run};
    use crate::symbol::{Symbol, SymbolKind};

    fn symbol(path: &str, role: &str, deps: &[&str]) -> Symbol {
        Symbol::new(path, "x", SymbolKind::File)
            .with_dependencies(deps.iter().map(|d| d.to_string()))
            .with_role(role)
    }

    fn roles(names: &[&str]) -> RoleReference {
        RoleReference::Roles(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn test_forbidden_edge_reports_full_context() {
        let fixture = Fixture::new(vec![
            symbol("src/domain/u.ts", "DOMAIN", &["src/infra/db.ts"]),
            symbol("src/infra/db.ts", "INFRA", &[]),
        ]);
        let violations = run(&fixture, |ctx| {
            evaluate(
                &rule("no-infra"),
                DependencyMode::Forbidden,
                &roles(&["DOMAIN"]),
                &DependencyTarget::Roles(roles(&["INFRA"])),
                ctx,
            )
        });

        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.file, "src/domain/u.ts");
        assert_eq!(v.from_role.as_deref(), Some("DOMAIN"));
        assert_eq!(v.to_role.as_deref(), Some("INFRA"));
        assert_eq!(v.dependency.as_deref(), Some("src/infra/db.ts"));
    }

    #[test]
    fn test_allowed_ignores_unknown_and_same_role() {
        let fixture = Fixture::new(vec![
            symbol(
                "src/app/service.ts",
                "APP",
                &["src/app/helper.ts", "scripts/gen.ts", "src/infra/db.ts"],
            ),
            symbol("src/app/helper.ts", "APP", &[]),
            symbol("scripts/gen.ts", UNKNOWN_ROLE, &[]),
            symbol("src/infra/db.ts", "INFRA", &[]),
        ]);
        let violations = run(&fixture, |ctx| {
            evaluate(
                &rule("allowlist"),
                DependencyMode::Allowed,
                &roles(&["APP"]),
                &DependencyTarget::Roles(roles(&["DOMAIN"])),
                ctx,
            )
        });

        // Only the cross-role edge to INFRA is out of the allowlist
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].dependency.as_deref(), Some("src/infra/db.ts"));
    }

    #[test]
    fn test_required_dependency_missing() {
        let fixture = Fixture::new(vec![
            symbol("src/app/a.ts", "APP", &["src/app/b.ts"]),
            symbol("src/app/b.ts", "APP", &[]),
            symbol("src/domain/d.ts", "DOMAIN", &[]),
        ]);
        let violations = run(&fixture, |ctx| {
            evaluate(
                &rule("needs-domain"),
                DependencyMode::Required,
                &roles(&["APP"]),
                &DependencyTarget::Roles(roles(&["DOMAIN"])),
                ctx,
            )
        });

        // Both APP files lack a DOMAIN dependency
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.dependency.is_none()));
    }

    #[test]
    fn test_circular_three_file_cycle_reported_once() {
        let fixture = Fixture::new(vec![
            symbol("a.ts", "ANY", &["b.ts"]),
            symbol("b.ts", "ANY", &["c.ts"]),
            symbol("c.ts", "ANY", &["a.ts"]),
        ]);
        let violations = run(&fixture, |ctx| {
            evaluate(
                &rule("no-cycles"),
                DependencyMode::Forbidden,
                &RoleReference::All,
                &DependencyTarget::Circular,
                ctx,
            )
        });

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].file, "a.ts");
        assert!(
            violations[0]
                .message
                .contains("a.ts -> b.ts -> c.ts -> a.ts")
        );
    }

    #[test]
    fn test_circular_ignores_edges_leaving_scope() {
        // a -> x -> a, but x is outside the from scope: no cycle in scope
        let fixture = Fixture::new(vec![
            symbol("src/app/a.ts", "APP", &["lib/x.ts"]),
            symbol("lib/x.ts", "LIB", &["src/app/a.ts"]),
        ]);
        let violations = run(&fixture, |ctx| {
            evaluate(
                &rule("no-cycles"),
                DependencyMode::Forbidden,
                &roles(&["APP"]),
                &DependencyTarget::Circular,
                ctx,
            )
        });

        assert!(violations.is_empty());
    }
}
