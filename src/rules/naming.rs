//! Naming pattern rule: file paths of a role must match a regex.

use crate::grammar::Rule;
use crate::rules::RuleContext;
use crate::types::{RoleReference, Violation};
use regex::Regex;

pub(crate) fn evaluate(
    rule: &Rule,
    scope: &RoleReference,
    pattern: &Regex,
    ctx: &RuleContext,
) -> Vec<Violation> {
    ctx.files_in_scope(scope)
        .into_iter()
        .filter(|(path, _)| !pattern.is_match(path))
        .map(|(path, role)| {
            Violation::new(
                &rule.name,
                rule.severity,
                path,
                format!("File path '{path}' does not match naming pattern '{pattern}'"),
            )
            .with_from_role(role)
        })
        .collect()
}
