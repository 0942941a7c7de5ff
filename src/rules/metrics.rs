//! Project-level metrics: test-to-production ratio and mean file
//! granularity. Both skip silently when the project has no production
//! files.

use crate::grammar::Rule;
use crate::rules::{RuleContext, is_test_file, line_count};
use crate::types::Violation;

pub(crate) fn evaluate_test_ratio(rule: &Rule, minimum: f64, ctx: &RuleContext) -> Vec<Violation> {
    let test_files = ctx.files.iter().filter(|f| is_test_file(f)).count();
    let production_files = ctx.files.len() - test_files;
    if production_files == 0 {
        return Vec::new();
    }

    let ratio = test_files as f64 / production_files as f64;
    if ratio >= minimum {
        return Vec::new();
    }

    vec![Violation::new(
        &rule.name,
        rule.severity,
        ".",
        format!(
            "Test ratio {ratio:.2} ({test_files} test / {production_files} production files) \
             is below the required {minimum:.2}"
        ),
    )]
}

pub(crate) fn evaluate_granularity(
    rule: &Rule,
    target_loc_per_file: f64,
    warning_threshold_multiplier: f64,
    ctx: &RuleContext,
) -> Vec<Violation> {
    // Mean over production files present in the cache; a cache miss means
    // no content inspected, so the file drops out of the mean entirely.
    let counts: Vec<usize> = ctx
        .files
        .iter()
        .filter(|f| !is_test_file(f))
        .filter_map(|f| ctx.cache.get(f))
        .map(line_count)
        .collect();
    if counts.is_empty() {
        return Vec::new();
    }

    let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
    let threshold = target_loc_per_file * warning_threshold_multiplier;
    if mean <= threshold {
        return Vec::new();
    }

    vec![Violation::new(
        &rule.name,
        rule.severity,
        ".",
        format!(
            "Mean file length {mean:.1} lines exceeds {threshold:.1} \
             (target {target_loc_per_file:.0} x {warning_threshold_multiplier:.2})"
        ),
    )]
}
