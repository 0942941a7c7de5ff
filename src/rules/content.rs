//! Content scanning rules: forbidden keywords, forbidden patterns, and
//! barrel purity. All three read the cache only.

use crate::grammar::Rule;
use crate::rules::RuleContext;
use crate::types::{RoleReference, Violation};
use regex::Regex;

/// One violation per (file, keyword) for case-sensitive literal matches.
pub(crate) fn evaluate_keywords(
    rule: &Rule,
    from: &RoleReference,
    keywords: &[String],
    ctx: &RuleContext,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (path, role) in ctx.files_in_scope(from) {
        let Some(content) = ctx.cache.get(path) else {
            continue;
        };
        for keyword in keywords {
            if content.contains(keyword.as_str()) {
                violations.push(
                    Violation::new(
                        &rule.name,
                        rule.severity,
                        path,
                        format!("'{path}' contains forbidden keyword '{keyword}'"),
                    )
                    .with_from_role(role),
                );
            }
        }
    }
    violations
}

/// One violation per (file, regex) match.
pub(crate) fn evaluate_patterns(
    rule: &Rule,
    from: &RoleReference,
    patterns: &[Regex],
    ctx: &RuleContext,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (path, role) in ctx.files_in_scope(from) {
        let Some(content) = ctx.cache.get(path) else {
            continue;
        };
        for pattern in patterns {
            if pattern.is_match(content) {
                violations.push(
                    Violation::new(
                        &rule.name,
                        rule.severity,
                        path,
                        format!("'{path}' matches forbidden pattern '{pattern}'"),
                    )
                    .with_from_role(role),
                );
            }
        }
    }
    violations
}

/// Barrel purity: files selected by path pattern (not by role) must not
/// match any of the forbidden content regexes.
pub(crate) fn evaluate_barrel(
    rule: &Rule,
    file_pattern: &Regex,
    forbidden: &[Regex],
    ctx: &RuleContext,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for path in ctx.files {
        if !file_pattern.is_match(path) {
            continue;
        }
        let Some(content) = ctx.cache.get(path) else {
            continue;
        };
        for pattern in forbidden {
            if pattern.is_match(content) {
                violations.push(Violation::new(
                    &rule.name,
                    rule.severity,
                    path.as_str(),
                    format!("Barrel file '{path}' contains content matching '{pattern}'"),
                ));
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{Fixture, rule, run};
    use crate::symbol::{Symbol, SymbolKind};

    fn fixture(path: &str, content: &str) -> Fixture {
        Fixture::new(vec![
            Symbol::new(path, "x", SymbolKind::File).with_role("ANY"),
        ])
        .with_content(path, content)
    }

    #[test]
    fn test_keyword_match_is_case_sensitive() {
        let fixture = fixture("src/a.ts", "console.log('debug');\n");
        let keywords = vec!["console.log".to_string(), "CONSOLE.LOG".to_string()];
        let violations = run(&fixture, |ctx| {
            evaluate_keywords(&rule("no-console"), &RoleReference::All, &keywords, ctx)
        });

        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("console.log"));
    }

    #[test]
    fn test_one_violation_per_offending_term() {
        let fixture = fixture("src/a.ts", "eval('x'); debugger;\n");
        let keywords = vec!["eval(".to_string(), "debugger".to_string()];
        let violations = run(&fixture, |ctx| {
            evaluate_keywords(&rule("no-dangerous"), &RoleReference::All, &keywords, ctx)
        });

        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_forbidden_pattern_matches_regex() {
        let fixture = fixture("src/a.ts", "const secret = process.env.API_KEY;\n");
        let patterns = vec![Regex::new(r"process\.env\.\w+").unwrap()];
        let violations = run(&fixture, |ctx| {
            evaluate_patterns(&rule("no-env"), &RoleReference::All, &patterns, ctx)
        });

        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_barrel_purity_one_violation_per_pattern() {
        let fixture = fixture(
            "src/index.ts",
            "export * from './a';\nconst leaked = 1;\nfunction helper() {}\n",
        );
        let file_pattern = Regex::new(r"index\.ts$").unwrap();
        let forbidden = vec![
            Regex::new(r"(?m)^const\s").unwrap(),
            Regex::new(r"(?m)^function\s").unwrap(),
            Regex::new(r"(?m)^class\s").unwrap(),
        ];
        let violations = run(&fixture, |ctx| {
            evaluate_barrel(&rule("pure-barrels"), &file_pattern, &forbidden, ctx)
        });

        // const and function matched; class did not
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_barrel_ignores_non_matching_paths() {
        let fixture = fixture("src/logic.ts", "const x = 1;\n");
        let file_pattern = Regex::new(r"index\.ts$").unwrap();
        let forbidden = vec![Regex::new(r"const").unwrap()];
        let violations = run(&fixture, |ctx| {
            evaluate_barrel(&rule("pure-barrels"), &file_pattern, &forbidden, ctx)
        });

        assert!(violations.is_empty());
    }
}
