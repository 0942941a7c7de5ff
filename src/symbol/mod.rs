//! The symbol model extracted from a language parse.
//!
//! A [`Symbol`] is an exported declaration within a file, or a synthetic
//! file-level symbol when the file exports nothing the model tracks. Paths
//! are always forward-slash normalized and relative to the project root,
//! and dependency sets only ever contain paths present in the parsed
//! symbol set.

use crate::types::UNKNOWN_ROLE;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Class,
    Interface,
    Function,
    Type,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    /// Forward-slash path relative to the project root.
    pub path: String,
    pub name: String,
    pub kind: SymbolKind,
    /// Intra-project file paths this symbol's file directly imports or
    /// re-exports. BTreeSet keeps iteration deterministic.
    pub dependencies: BTreeSet<String>,
    /// Assigned by role assignment; `UNKNOWN` until then.
    pub role: String,
}

impl Symbol {
    pub fn new(path: impl Into<String>, name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            kind,
            dependencies: BTreeSet::new(),
            role: UNKNOWN_ROLE.to_string(),
        }
    }

    /// Synthetic symbol for a file with no tracked exports, named after the
    /// file stem.
    pub fn for_file(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = file_stem(&path).to_string();
        Self::new(path, name, SymbolKind::File)
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

/// Last path segment of a forward-slash relative path.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Basename without its final extension.
pub fn file_stem(path: &str) -> &str {
    let base = basename(path);
    match base.rfind('.') {
        Some(0) | None => base,
        Some(idx) => &base[..idx],
    }
}

/// Final extension of the basename, without the dot.
pub fn extension(path: &str) -> Option<&str> {
    let base = basename(path);
    match base.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&base[idx + 1..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_defaults_to_unknown_role() {
        let symbol = Symbol::new("src/a.ts", "A", SymbolKind::Class);
        assert_eq!(symbol.role, UNKNOWN_ROLE);
        assert!(symbol.dependencies.is_empty());
    }

    #[test]
    fn test_file_symbol_named_after_stem() {
        let symbol = Symbol::for_file("src/infra/db.ts");
        assert_eq!(symbol.name, "db");
        assert_eq!(symbol.kind, SymbolKind::File);
    }

    #[test]
    fn test_with_dependencies_and_role() {
        let symbol = Symbol::new("src/a.ts", "A", SymbolKind::Function)
            .with_dependencies(["src/b.ts", "src/c.ts"])
            .with_role("DOMAIN");

        assert_eq!(symbol.role, "DOMAIN");
        assert!(symbol.dependencies.contains("src/b.ts"));
        assert_eq!(symbol.dependencies.len(), 2);
    }

    #[test]
    fn test_path_helpers() {
        assert_eq!(basename("src/domain/user.ts"), "user.ts");
        assert_eq!(file_stem("src/domain/user.service.ts"), "user.service");
        assert_eq!(extension("src/domain/user.ts"), Some("ts"));
        assert_eq!(file_stem("Makefile"), "Makefile");
        assert_eq!(extension("Makefile"), None);
        assert_eq!(file_stem(".gitignore"), ".gitignore");
    }
}
