//! Rule evaluators and the dispatcher that routes grammar rules to them.
//!
//! Every evaluator consumes the same read-only context: the roled symbol
//! list, the pre-filled content cache, the enumerated file listing, and an
//! existence checker for directory-level rules. Evaluators return
//! violations, never errors: anything unexpected inside a rule (a cache
//! miss, an unparseable class body) degrades to "no finding".

pub mod complexity;
pub mod content;
pub mod dependency;
pub mod documentation;
pub mod file_size;
pub mod metrics;
pub mod naming;
pub mod structure;
pub mod synonyms;
pub mod test_coverage;
pub mod unreferenced;

use crate::analysis::cache::{FileContentCache, FileExistenceChecker};
use crate::grammar::{Grammar, RuleKind};
use crate::symbol::{Symbol, basename};
use crate::types::{RoleReference, Violation};
use std::collections::HashMap;

/// Read-only view evaluators work against.
pub struct RuleContext<'a> {
    pub symbols: &'a [Symbol],
    pub cache: &'a FileContentCache,
    /// Enumerated project files, sorted, relative with forward slashes.
    pub files: &'a [String],
    pub existence: &'a dyn FileExistenceChecker,
}

impl RuleContext<'_> {
    /// Unique (path, role) pairs over the symbol list, path-sorted. File
    /// scoped rules run once per entry, so multi-export files are never
    /// reported twice.
    pub(crate) fn roled_files(&self) -> Vec<(&str, &str)> {
        let mut files: Vec<(&str, &str)> = Vec::new();
        for symbol in self.symbols {
            if !files.iter().any(|(path, _)| *path == symbol.path) {
                files.push((symbol.path.as_str(), symbol.role.as_str()));
            }
        }
        files.sort_unstable();
        files
    }

    /// Roled files whose role satisfies the reference.
    pub(crate) fn files_in_scope(&self, scope: &RoleReference) -> Vec<(&str, &str)> {
        self.roled_files()
            .into_iter()
            .filter(|(_, role)| scope.matches(role))
            .collect()
    }

    /// Path → role lookup for dependency targets.
    pub(crate) fn role_by_path(&self) -> HashMap<&str, &str> {
        self.symbols
            .iter()
            .map(|s| (s.path.as_str(), s.role.as_str()))
            .collect()
    }
}

/// Line count as the engine defines it everywhere: `\n`-separated parts.
pub(crate) fn line_count(content: &str) -> usize {
    content.split('\n').count()
}

/// Test files are identified by `.spec.` or `.test.` in the basename.
pub(crate) fn is_test_file(path: &str) -> bool {
    let base = basename(path);
    base.contains(".spec.") || base.contains(".test.")
}

/// Route every grammar rule to its evaluator and concatenate the results.
/// The rule set is closed at load time; this match is the whole dispatch.
pub fn dispatch(grammar: &Grammar, ctx: &RuleContext) -> Vec<Violation> {
    let mut violations = Vec::new();
    for rule in &grammar.rules {
        let found = match &rule.kind {
            RuleKind::Dependency { mode, from, target } => {
                dependency::evaluate(rule, *mode, from, target, ctx)
            }
            RuleKind::NamingPattern { scope, pattern } => {
                naming::evaluate(rule, scope, pattern, ctx)
            }
            RuleKind::FindSynonyms {
                scope,
                threshold,
                thesaurus,
            } => synonyms::evaluate(rule, scope, *threshold, thesaurus, ctx),
            RuleKind::DetectUnreferenced { scope, ignore } => {
                unreferenced::evaluate(rule, scope, ignore, ctx)
            }
            RuleKind::FileSize { scope, max_lines } => {
                file_size::evaluate(rule, scope, *max_lines, ctx)
            }
            RuleKind::TestCoverage { from } => test_coverage::evaluate(rule, from, ctx),
            RuleKind::ClassComplexity {
                scope,
                max_public_methods,
                max_properties,
            } => complexity::evaluate(rule, scope, *max_public_methods, *max_properties, ctx),
            RuleKind::DocumentationRequired {
                scope,
                min_lines,
                requires_jsdoc,
            } => documentation::evaluate(rule, scope, *min_lines, *requires_jsdoc, ctx),
            RuleKind::ForbiddenKeywords { from, keywords } => {
                content::evaluate_keywords(rule, from, keywords, ctx)
            }
            RuleKind::ForbiddenPatterns { from, patterns } => {
                content::evaluate_patterns(rule, from, patterns, ctx)
            }
            RuleKind::BarrelPurity {
                file_pattern,
                forbidden,
            } => content::evaluate_barrel(rule, file_pattern, forbidden, ctx),
            RuleKind::RequiredStructure { directories } => {
                structure::evaluate(rule, directories, ctx)
            }
            RuleKind::MinimumTestRatio { ratio } => metrics::evaluate_test_ratio(rule, *ratio, ctx),
            RuleKind::GranularityMetric {
                target_loc_per_file,
                warning_threshold_multiplier,
            } => metrics::evaluate_granularity(
                rule,
                *target_loc_per_file,
                *warning_threshold_multiplier,
                ctx,
            ),
        };
        violations.extend(found);
    }
    violations
}
