//! Grammar discovery, parsing, and the raw document shapes.
//!
//! Loading runs in four steps: locate the document under the project root,
//! parse the YAML, run structural validation against the sibling schema
//! document when one is available, then deserialize and hand off to
//! semantic validation and compilation. Any failure aborts the load; the
//! engine never analyzes with a partially valid grammar.

use crate::error::{GrammarError, GrammarResult};
use crate::grammar::{Grammar, schema, validate};
use crate::types::Severity;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File names probed under the project root, in order.
pub const GRAMMAR_FILE_NAMES: [&str; 2] = ["nooa.grammar.yaml", "nooa.grammar.yml"];

/// Loads and validates a grammar document.
#[derive(Debug, Default)]
pub struct GrammarLoader {
    /// Explicit grammar file path; skips discovery when set.
    grammar_path: Option<PathBuf>,
    /// Explicit schema document path; skips schema discovery when set.
    schema_path: Option<PathBuf>,
}

impl GrammarLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific grammar file instead of probing the project root.
    pub fn with_grammar_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.grammar_path = Some(path.into());
        self
    }

    /// Use a specific structural schema document.
    pub fn with_schema_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_path = Some(path.into());
        self
    }

    /// Load, validate, and compile the grammar for a project.
    pub fn load(&self, project_root: &Path) -> GrammarResult<Grammar> {
        let path = match &self.grammar_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(GrammarError::NotFound {
                        root: project_root.to_path_buf(),
                    });
                }
                path.clone()
            }
            None => Self::discover(project_root)?,
        };

        let text = std::fs::read_to_string(&path).map_err(|source| GrammarError::Read {
            path: path.clone(),
            source,
        })?;

        let document: serde_yaml::Value =
            serde_yaml::from_str(&text).map_err(|e| GrammarError::Unparseable {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        match schema::StructuralSchema::locate(self.schema_path.as_deref()) {
            Some(schema) => {
                let errors = schema.validate(&document);
                if !errors.is_empty() {
                    return Err(GrammarError::Schema { errors });
                }
            }
            None => {
                tracing::debug!("no grammar schema document found; structural validation skipped");
            }
        }

        let raw: RawGrammar =
            serde_yaml::from_value(document).map_err(|e| GrammarError::Shape {
                reason: e.to_string(),
            })?;

        let grammar = validate::compile(raw)?;
        tracing::debug!(
            roles = grammar.roles.len(),
            rules = grammar.rules.len(),
            "grammar loaded from {}",
            path.display()
        );
        Ok(grammar)
    }

    fn discover(project_root: &Path) -> GrammarResult<PathBuf> {
        for name in GRAMMAR_FILE_NAMES {
            let candidate = project_root.join(name);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        Err(GrammarError::NotFound {
            root: project_root.to_path_buf(),
        })
    }
}

// Raw document shapes. These only exist between YAML deserialization and
// compilation into the typed `Grammar`; nothing downstream sees them.

#[derive(Debug, Deserialize)]
pub(crate) struct RawGrammar {
    pub version: String,
    pub language: String,
    pub roles: Vec<RawRole>,
    pub rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRole {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A role reference as written: a bare string or a list of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawRoleNames {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawFrom {
    pub role: RawRoleNames,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawTo {
    #[serde(default)]
    pub role: Option<RawRoleNames>,
    #[serde(default)]
    pub circular: Option<bool>,
    #[serde(default)]
    pub test_file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawFor {
    #[serde(default)]
    pub role: Option<RawRoleNames>,
    #[serde(default)]
    pub file_pattern: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawGlobal {
    #[serde(default)]
    pub test_ratio: Option<f64>,
    #[serde(default)]
    pub target_loc_per_file: Option<f64>,
    #[serde(default)]
    pub warning_threshold_multiplier: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRule {
    pub name: String,
    pub severity: Severity,
    /// Rule kind tag; see [`crate::grammar::RuleKind`].
    pub rule: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub from: Option<RawFrom>,
    #[serde(default)]
    pub to: Option<RawTo>,
    #[serde(default, rename = "for")]
    pub scope: Option<RawFor>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub similarity_threshold: Option<f64>,
    #[serde(default)]
    pub thesaurus: Option<Vec<Vec<String>>>,
    #[serde(default)]
    pub ignore_patterns: Option<Vec<String>>,
    #[serde(default)]
    pub max_lines: Option<u64>,
    #[serde(default)]
    pub max_public_methods: Option<u64>,
    #[serde(default)]
    pub max_properties: Option<u64>,
    #[serde(default)]
    pub min_lines: Option<u64>,
    #[serde(default)]
    pub requires_jsdoc: Option<bool>,
    #[serde(default)]
    pub contains_forbidden: Option<Vec<String>>,
    #[serde(default)]
    pub required_directories: Option<Vec<String>>,
    #[serde(default)]
    pub global: Option<RawGlobal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MINIMAL: &str = "\
version: \"1.0\"
language: typescript
roles:
  - name: DOMAIN
    path: \"^src/domain/\"
rules:
  - name: domain-naming
    severity: warning
    rule: naming_pattern
    for:
      role: DOMAIN
    pattern: \"^src/domain/.*\\\\.ts$\"
";

    #[test]
    fn test_discovers_yaml_then_yml() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("nooa.grammar.yml"), MINIMAL).unwrap();
        let grammar = GrammarLoader::new().load(root).unwrap();
        assert_eq!(grammar.roles.len(), 1);

        // .yaml wins over .yml when both exist
        fs::write(
            root.join("nooa.grammar.yaml"),
            MINIMAL.replace("DOMAIN", "CORE"),
        )
        .unwrap();
        let grammar = GrammarLoader::new().load(root).unwrap();
        assert_eq!(grammar.roles[0].name, "CORE");
    }

    #[test]
    fn test_missing_grammar_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = GrammarLoader::new().load(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("Grammar file not found"));
    }

    #[test]
    fn test_invalid_yaml_is_unparseable() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("nooa.grammar.yaml"), "roles: [unclosed").unwrap();

        let err = GrammarLoader::new().load(root).unwrap_err();
        assert!(matches!(err, GrammarError::Unparseable { .. }));
    }
}
