//! File size rule: line count must not exceed the configured maximum.

use crate::grammar::Rule;
use crate::rules::{RuleContext, line_count};
use crate::types::{RoleReference, Violation};

pub(crate) fn evaluate(
    rule: &Rule,
    scope: &RoleReference,
    max_lines: usize,
    ctx: &RuleContext,
) -> Vec<Violation> {
    ctx.files_in_scope(scope)
        .into_iter()
        .filter_map(|(path, role)| {
            let lines = line_count(ctx.cache.get(path)?);
            (lines > max_lines).then(|| {
                Violation::new(
                    &rule.name,
                    rule.severity,
                    path,
                    format!("'{path}' has {lines} lines, exceeding the maximum of {max_lines}"),
                )
                .with_from_role(role)
            })
        })
        .collect()
}
