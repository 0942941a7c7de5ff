//! Required structure rule: directories the project tree must contain.

use crate::grammar::Rule;
use crate::rules::RuleContext;
use crate::types::Violation;

pub(crate) fn evaluate(rule: &Rule, directories: &[String], ctx: &RuleContext) -> Vec<Violation> {
    directories
        .iter()
        .filter(|dir| !ctx.existence.exists(dir))
        .map(|dir| {
            Violation::new(
                &rule.name,
                rule.severity,
                dir.as_str(),
                format!("Required directory '{dir}' is missing"),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{Fixture, rule, run};

    #[test]
    fn test_missing_directories_reported_individually() {
        let mut fixture = Fixture::new(Vec::new());
        fixture.existing = vec!["src/domain".to_string()];

        let directories = vec![
            "src/domain".to_string(),
            "src/application".to_string(),
            "tests".to_string(),
        ];
        let violations = run(&fixture, |ctx| evaluate(&rule("layout"), &directories, ctx));

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].file, "src/application");
        assert_eq!(violations[1].file, "tests");
    }
}
