//! Test coverage rule: every file in scope needs a `.spec.` or `.test.`
//! counterpart, next to it or in a parallel `tests/` tree.

use crate::grammar::Rule;
use crate::rules::RuleContext;
use crate::symbol::{extension, file_stem};
use crate::types::{RoleReference, Violation};
use std::collections::HashSet;

const TEST_SUFFIXES: [&str; 2] = ["spec", "test"];

pub(crate) fn evaluate(rule: &Rule, from: &RoleReference, ctx: &RuleContext) -> Vec<Violation> {
    let file_set: HashSet<&str> = ctx.files.iter().map(String::as_str).collect();

    ctx.files_in_scope(from)
        .into_iter()
        .filter_map(|(path, role)| {
            let candidates = candidate_test_paths(path);
            let covered = candidates.iter().any(|c| file_set.contains(c.as_str()));
            (!covered).then(|| {
                Violation::new(
                    &rule.name,
                    rule.severity,
                    path,
                    format!(
                        "No test file found for '{path}' (looked for e.g. '{}')",
                        candidates.first().map_or("", String::as_str)
                    ),
                )
                .with_from_role(role)
            })
        })
        .collect()
}

/// Candidate test paths for `dir/base.ext`: suffixed siblings, then the
/// same suffixes under `tests/` with the leading path segment dropped, then
/// under `tests/` with the full path kept.
pub(crate) fn candidate_test_paths(path: &str) -> Vec<String> {
    let stem = file_stem(path);
    let ext = extension(path).unwrap_or("ts");
    let dir = match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    };

    let mut prefixes: Vec<String> = Vec::new();
    if dir.is_empty() {
        prefixes.push(String::new());
        prefixes.push("tests/".to_string());
    } else {
        prefixes.push(format!("{dir}/"));
        match dir.split_once('/') {
            Some((_, rest)) => prefixes.push(format!("tests/{rest}/")),
            None => prefixes.push("tests/".to_string()),
        }
        prefixes.push(format!("tests/{dir}/"));
    }

    let mut candidates = Vec::new();
    for prefix in prefixes {
        for suffix in TEST_SUFFIXES {
            let candidate = format!("{prefix}{stem}.{suffix}.{ext}");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }
    candidates
}
