//! Semantic validation and compilation of the raw grammar document.
//!
//! Fails on the first offender, naming it: an uncompilable regex, a role
//! reference that resolves to nothing, or a duplicate rule name. On success
//! every pattern in the resulting [`Grammar`] is compiled; evaluators never
//! see pattern source text they would have to compile themselves.

use crate::error::{GrammarError, GrammarResult};
use crate::grammar::loader::{RawGrammar, RawRoleNames, RawRule};
use crate::grammar::{
    DependencyMode, DependencyTarget, Grammar, Rule, RoleDefinition, RuleKind,
};
use crate::types::{ALL_ROLES, RoleReference};
use regex::Regex;
use std::collections::HashSet;

pub(crate) fn compile(raw: RawGrammar) -> GrammarResult<Grammar> {
    let mut roles = Vec::with_capacity(raw.roles.len());
    for role in raw.roles {
        let pattern = compile_regex(&format!("role '{}'", role.name), &role.path)?;
        roles.push(RoleDefinition {
            name: role.name,
            path: role.path,
            pattern,
            description: role.description,
        });
    }

    let mut seen = HashSet::new();
    for rule in &raw.rules {
        if !seen.insert(rule.name.as_str()) {
            return Err(GrammarError::DuplicateRuleName {
                name: rule.name.clone(),
            });
        }
    }

    let known: HashSet<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    let mut rules = Vec::with_capacity(raw.rules.len());
    for rule in &raw.rules {
        rules.push(Rule {
            name: rule.name.clone(),
            severity: rule.severity,
            comment: rule.comment.clone(),
            kind: compile_rule(rule, &known)?,
        });
    }

    Ok(Grammar {
        version: raw.version,
        language: raw.language,
        roles,
        rules,
    })
}

fn compile_rule(rule: &RawRule, known: &HashSet<&str>) -> GrammarResult<RuleKind> {
    let kind = match rule.rule.as_str() {
        mode @ ("allowed" | "forbidden" | "required") => {
            let from = from_selector(rule, known)?;
            let to = rule.to.as_ref().ok_or_else(|| shape(rule, "requires 'to'"))?;
            let target = if to.circular == Some(true) {
                DependencyTarget::Circular
            } else {
                let names = to
                    .role
                    .as_ref()
                    .ok_or_else(|| shape(rule, "requires 'to.role' or 'to.circular: true'"))?;
                DependencyTarget::Roles(resolve_roles(rule, names, known)?)
            };
            RuleKind::Dependency {
                mode: match mode {
                    "allowed" => DependencyMode::Allowed,
                    "forbidden" => DependencyMode::Forbidden,
                    _ => DependencyMode::Required,
                },
                from,
                target,
            }
        }
        "naming_pattern" => RuleKind::NamingPattern {
            scope: for_selector(rule, known)?,
            pattern: rule_regex(rule, rule.pattern.as_deref(), "pattern")?,
        },
        "find_synonyms" => RuleKind::FindSynonyms {
            scope: for_selector(rule, known)?,
            threshold: rule
                .similarity_threshold
                .ok_or_else(|| shape(rule, "requires 'similarity_threshold'"))?,
            thesaurus: rule.thesaurus.clone().unwrap_or_default(),
        },
        "detect_unreferenced" => {
            let mut ignore = Vec::new();
            for pattern in rule.ignore_patterns.as_deref().unwrap_or_default() {
                ignore.push(compile_regex(&format!("rule '{}'", rule.name), pattern)?);
            }
            RuleKind::DetectUnreferenced {
                scope: for_selector(rule, known)?,
                ignore,
            }
        }
        "file_size" => RuleKind::FileSize {
            scope: for_selector(rule, known)?,
            max_lines: rule
                .max_lines
                .ok_or_else(|| shape(rule, "requires 'max_lines'"))? as usize,
        },
        "test_coverage" => RuleKind::TestCoverage {
            from: from_selector(rule, known)?,
        },
        "class_complexity" => RuleKind::ClassComplexity {
            scope: for_selector(rule, known)?,
            max_public_methods: rule
                .max_public_methods
                .ok_or_else(|| shape(rule, "requires 'max_public_methods'"))?
                as usize,
            max_properties: rule
                .max_properties
                .ok_or_else(|| shape(rule, "requires 'max_properties'"))?
                as usize,
        },
        "documentation_required" => RuleKind::DocumentationRequired {
            scope: for_selector(rule, known)?,
            min_lines: rule
                .min_lines
                .ok_or_else(|| shape(rule, "requires 'min_lines'"))? as usize,
            requires_jsdoc: rule.requires_jsdoc.unwrap_or(false),
        },
        "forbidden_keywords" => RuleKind::ForbiddenKeywords {
            from: from_selector(rule, known)?,
            keywords: rule
                .contains_forbidden
                .clone()
                .ok_or_else(|| shape(rule, "requires 'contains_forbidden'"))?,
        },
        "forbidden_patterns" => RuleKind::ForbiddenPatterns {
            from: from_selector(rule, known)?,
            patterns: forbidden_regexes(rule)?,
        },
        "barrel_purity" => {
            let file_pattern = rule
                .scope
                .as_ref()
                .and_then(|s| s.file_pattern.as_deref())
                .ok_or_else(|| shape(rule, "requires 'for.file_pattern'"))?;
            RuleKind::BarrelPurity {
                file_pattern: rule_regex(rule, Some(file_pattern), "for.file_pattern")?,
                forbidden: forbidden_regexes(rule)?,
            }
        }
        "required_structure" => RuleKind::RequiredStructure {
            directories: rule
                .required_directories
                .clone()
                .ok_or_else(|| shape(rule, "requires 'required_directories'"))?,
        },
        "minimum_test_ratio" => RuleKind::MinimumTestRatio {
            ratio: rule
                .global
                .as_ref()
                .and_then(|g| g.test_ratio)
                .ok_or_else(|| shape(rule, "requires 'global.test_ratio'"))?,
        },
        "granularity_metric" => {
            let global = rule
                .global
                .as_ref()
                .ok_or_else(|| shape(rule, "requires 'global'"))?;
            RuleKind::GranularityMetric {
                target_loc_per_file: global
                    .target_loc_per_file
                    .ok_or_else(|| shape(rule, "requires 'global.target_loc_per_file'"))?,
                warning_threshold_multiplier: global
                    .warning_threshold_multiplier
                    .ok_or_else(|| shape(rule, "requires 'global.warning_threshold_multiplier'"))?,
            }
        }
        other => {
            return Err(GrammarError::Shape {
                reason: format!("rule '{}': unknown rule kind '{other}'", rule.name),
            });
        }
    };
    Ok(kind)
}

fn shape(rule: &RawRule, reason: &str) -> GrammarError {
    GrammarError::Shape {
        reason: format!("rule '{}': {} {reason}", rule.name, rule.rule),
    }
}

fn from_selector(rule: &RawRule, known: &HashSet<&str>) -> GrammarResult<RoleReference> {
    let names = rule
        .from
        .as_ref()
        .map(|f| &f.role)
        .ok_or_else(|| shape(rule, "requires 'from.role'"))?;
    resolve_roles(rule, names, known)
}

fn for_selector(rule: &RawRule, known: &HashSet<&str>) -> GrammarResult<RoleReference> {
    let names = rule
        .scope
        .as_ref()
        .and_then(|s| s.role.as_ref())
        .ok_or_else(|| shape(rule, "requires 'for.role'"))?;
    resolve_roles(rule, names, known)
}

/// Resolve a written role reference. A bare `ALL` becomes the meta-match;
/// anything else must be a declared role name.
fn resolve_roles(
    rule: &RawRule,
    names: &RawRoleNames,
    known: &HashSet<&str>,
) -> GrammarResult<RoleReference> {
    let list: Vec<String> = match names {
        RawRoleNames::One(name) if name == ALL_ROLES => return Ok(RoleReference::All),
        RawRoleNames::One(name) => vec![name.clone()],
        RawRoleNames::Many(names) => names.clone(),
    };
    for role in &list {
        if !known.contains(role.as_str()) {
            return Err(GrammarError::UnknownRole {
                rule: rule.name.clone(),
                role: role.clone(),
            });
        }
    }
    Ok(RoleReference::Roles(list))
}

fn rule_regex(rule: &RawRule, pattern: Option<&str>, field: &str) -> GrammarResult<Regex> {
    let pattern = pattern.ok_or_else(|| shape(rule, &format!("requires '{field}'")))?;
    compile_regex(&format!("rule '{}'", rule.name), pattern)
}

fn forbidden_regexes(rule: &RawRule) -> GrammarResult<Vec<Regex>> {
    let patterns = rule
        .contains_forbidden
        .as_ref()
        .ok_or_else(|| shape(rule, "requires 'contains_forbidden'"))?;
    patterns
        .iter()
        .map(|p| compile_regex(&format!("rule '{}'", rule.name), p))
        .collect()
}

fn compile_regex(owner: &str, pattern: &str) -> GrammarResult<Regex> {
    Regex::new(pattern).map_err(|e| GrammarError::InvalidRegex {
        owner: owner.to_string(),
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
