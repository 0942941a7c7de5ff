//! Role assignment: first declared pattern that matches a symbol's path
//! names its role.

use crate::grammar::Grammar;
use crate::symbol::Symbol;
use crate::types::UNKNOWN_ROLE;

/// Annotates symbols with role names. Pure: the input sequence is never
/// mutated, re-running over the same grammar and symbols yields identical
/// roles.
pub struct RoleAssigner<'g> {
    grammar: &'g Grammar,
}

impl<'g> RoleAssigner<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self { grammar }
    }

    /// Role for a single path: first match wins, `UNKNOWN` otherwise.
    pub fn role_for(&self, path: &str) -> &'g str {
        self.grammar
            .roles
            .iter()
            .find(|role| role.pattern.is_match(path))
            .map_or(UNKNOWN_ROLE, |role| role.name.as_str())
    }

    /// Return a new sequence with every symbol's role assigned.
    pub fn assign(&self, symbols: &[Symbol]) -> Vec<Symbol> {
        symbols
            .iter()
            .map(|symbol| symbol.clone().with_role(self.role_for(&symbol.path)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarLoader;
    use crate::symbol::SymbolKind;
    use std::fs;
    use tempfile::TempDir;

    fn grammar_with_roles(roles: &[(&str, &str)]) -> Grammar {
        let mut yaml = String::from("version: '1.0'\nlanguage: typescript\nroles:\n");
        for (name, path) in roles {
            yaml.push_str(&format!("  - name: {name}\n    path: '{path}'\n"));
        }
        yaml.push_str("rules: []\n");

        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("nooa.grammar.yaml"), yaml).unwrap();
        GrammarLoader::new().load(temp_dir.path()).unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let grammar = grammar_with_roles(&[("A", "^src/a/b/"), ("B", "^src/a/")]);
        let assigner = RoleAssigner::new(&grammar);

        assert_eq!(assigner.role_for("src/a/b/x"), "A");
        assert_eq!(assigner.role_for("src/a/y"), "B");
    }

    #[test]
    fn test_unmatched_paths_are_unknown() {
        let grammar = grammar_with_roles(&[("DOMAIN", "^src/domain/")]);
        let assigner = RoleAssigner::new(&grammar);

        assert_eq!(assigner.role_for("scripts/build.ts"), UNKNOWN_ROLE);
    }

    #[test]
    fn test_assignment_is_deterministic_and_pure() {
        let grammar = grammar_with_roles(&[("DOMAIN", "^src/domain/")]);
        let assigner = RoleAssigner::new(&grammar);

        let symbols = vec![
            Symbol::new("src/domain/user.ts", "User", SymbolKind::Class),
            Symbol::new("src/domain/user.ts", "UserId", SymbolKind::Type),
        ];

        let first = assigner.assign(&symbols);
        let second = assigner.assign(&symbols);
        assert_eq!(first, second);

        // Symbols sharing a path share a role
        assert_eq!(first[0].role, "DOMAIN");
        assert_eq!(first[1].role, "DOMAIN");

        // Inputs untouched
        assert_eq!(symbols[0].role, UNKNOWN_ROLE);
    }
}
