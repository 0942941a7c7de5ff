//! Structural validation of the grammar document.
//!
//! The constraints live in a sibling `nooa.grammar.schema.json` document.
//! When that document cannot be located the structural pass is skipped and
//! only semantic validation runs; a grammar that parses but is structurally
//! wrong will then surface as a shape error instead of a field-by-field
//! report.
//!
//! Unlike semantic validation, which stops at the first offender, this pass
//! walks the whole document and reports every problem it finds at once.

use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Default file name of the schema document, expected next to the analyzer.
pub const SCHEMA_FILE_NAME: &str = "nooa.grammar.schema.json";

/// Environment variable overriding schema discovery.
pub const SCHEMA_ENV_VAR: &str = "NOOA_GRAMMAR_SCHEMA";

/// Structural constraints extracted from the schema document.
#[derive(Debug, Clone)]
pub struct StructuralSchema {
    required_top_level: Vec<String>,
    severities: Vec<String>,
    rule_tags: Vec<String>,
}

impl StructuralSchema {
    /// Locate and load the schema document.
    ///
    /// Candidates, in order: the explicit override, `$NOOA_GRAMMAR_SCHEMA`,
    /// a sibling of the running executable, the current directory. Returns
    /// `None` when no candidate is readable.
    pub fn locate(override_path: Option<&Path>) -> Option<Self> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(path) = override_path {
            candidates.push(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(SCHEMA_ENV_VAR) {
            candidates.push(PathBuf::from(path));
        }
        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join(SCHEMA_FILE_NAME));
        }
        candidates.push(PathBuf::from(SCHEMA_FILE_NAME));

        candidates.iter().find_map(|path| Self::load(path))
    }

    /// Parse the schema document, extracting the pieces the validator is
    /// driven by: required top-level fields and the severity/tag enums.
    pub fn load(path: &Path) -> Option<Self> {
        let text = std::fs::read_to_string(path).ok()?;
        let doc: serde_json::Value = serde_json::from_str(&text).ok()?;

        let string_list = |value: &serde_json::Value| -> Option<Vec<String>> {
            value
                .as_array()?
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect()
        };

        Some(Self {
            required_top_level: string_list(doc.get("required")?)?,
            severities: string_list(doc.pointer("/definitions/severity/enum")?)?,
            rule_tags: string_list(doc.pointer("/definitions/ruleTag/enum")?)?,
        })
    }

    /// Check the parsed YAML document against the structural constraints.
    /// Returns one message per problem; empty means the document passed.
    pub fn validate(&self, doc: &Value) -> Vec<String> {
        let mut errors = Vec::new();

        if doc.as_mapping().is_none() {
            errors.push("grammar document must be a mapping".to_string());
            return errors;
        }

        for field in &self.required_top_level {
            if doc.get(field.as_str()).is_none() {
                errors.push(format!("missing required field '{field}'"));
            }
        }
        for field in ["version", "language"] {
            if let Some(value) = doc.get(field)
                && value.as_str().is_none()
            {
                errors.push(format!("field '{field}' must be a string"));
            }
        }

        match doc.get("roles").and_then(Value::as_sequence) {
            Some(roles) => {
                for (idx, role) in roles.iter().enumerate() {
                    self.validate_role(idx, role, &mut errors);
                }
            }
            None => {
                if doc.get("roles").is_some() {
                    errors.push("field 'roles' must be a list".to_string());
                }
            }
        }

        match doc.get("rules").and_then(Value::as_sequence) {
            Some(rules) => {
                for (idx, rule) in rules.iter().enumerate() {
                    self.validate_rule(idx, rule, &mut errors);
                }
            }
            None => {
                if doc.get("rules").is_some() {
                    errors.push("field 'rules' must be a list".to_string());
                }
            }
        }

        errors
    }

    fn validate_role(&self, idx: usize, role: &Value, errors: &mut Vec<String>) {
        let label = role
            .get("name")
            .and_then(Value::as_str)
            .map_or_else(|| format!("roles[{idx}]"), |n| format!("role '{n}'"));

        if role.get("name").and_then(Value::as_str).is_none() {
            errors.push(format!("{label}: missing required string field 'name'"));
        }
        if role.get("path").and_then(Value::as_str).is_none() {
            errors.push(format!("{label}: missing required string field 'path'"));
        }
    }

    fn validate_rule(&self, idx: usize, rule: &Value, errors: &mut Vec<String>) {
        let label = rule
            .get("name")
            .and_then(Value::as_str)
            .map_or_else(|| format!("rules[{idx}]"), |n| format!("rule '{n}'"));

        if rule.get("name").and_then(Value::as_str).is_none() {
            errors.push(format!("{label}: missing required string field 'name'"));
        }

        match rule.get("severity").and_then(Value::as_str) {
            Some(severity) if self.severities.iter().any(|s| s == severity) => {}
            Some(severity) => errors.push(format!(
                "{label}: severity '{severity}' is not one of {:?}",
                self.severities
            )),
            None => errors.push(format!("{label}: missing required field 'severity'")),
        }

        let tag = match rule.get("rule").and_then(Value::as_str) {
            Some(tag) if self.rule_tags.iter().any(|t| t == tag) => tag,
            Some(tag) => {
                errors.push(format!("{label}: unknown rule kind '{tag}'"));
                return;
            }
            None => {
                errors.push(format!("{label}: missing required field 'rule'"));
                return;
            }
        };

        match tag {
            "allowed" | "forbidden" | "required" => {
                require_role_selector(rule, "from", &label, errors);
                let to_role = rule.get("to").and_then(|t| t.get("role")).is_some();
                let to_circular = rule
                    .get("to")
                    .and_then(|t| t.get("circular"))
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                match (to_role, to_circular) {
                    (true, true) => errors.push(format!(
                        "{label}: 'to.role' and 'to.circular' are mutually exclusive"
                    )),
                    (false, false) => errors.push(format!(
                        "{label}: requires either 'to.role' or 'to.circular: true'"
                    )),
                    _ => {}
                }
            }
            "naming_pattern" => {
                require_role_selector(rule, "for", &label, errors);
                require_string(rule, "pattern", &label, errors);
            }
            "find_synonyms" => {
                require_role_selector(rule, "for", &label, errors);
                match rule.get("similarity_threshold").and_then(Value::as_f64) {
                    Some(t) if (0.0..=1.0).contains(&t) => {}
                    Some(t) => errors.push(format!(
                        "{label}: similarity_threshold {t} is outside [0, 1]"
                    )),
                    None => errors.push(format!(
                        "{label}: missing required number field 'similarity_threshold'"
                    )),
                }
                if let Some(thesaurus) = rule.get("thesaurus")
                    && !is_string_list_list(thesaurus)
                {
                    errors.push(format!(
                        "{label}: 'thesaurus' must be a list of synonym groups (lists of strings)"
                    ));
                }
            }
            "detect_unreferenced" => {
                require_role_selector(rule, "for", &label, errors);
                if let Some(patterns) = rule.get("ignore_patterns")
                    && !is_string_list(patterns)
                {
                    errors.push(format!("{label}: 'ignore_patterns' must be a list of strings"));
                }
            }
            "file_size" => {
                require_role_selector(rule, "for", &label, errors);
                match rule.get("max_lines").and_then(Value::as_u64) {
                    Some(n) if n >= 1 => {}
                    Some(_) => errors.push(format!("{label}: 'max_lines' must be at least 1")),
                    None => errors.push(format!(
                        "{label}: missing required positive integer field 'max_lines'"
                    )),
                }
            }
            "test_coverage" => {
                require_role_selector(rule, "from", &label, errors);
                match rule.get("to").and_then(|t| t.get("test_file")).and_then(Value::as_str) {
                    Some("required") => {}
                    Some(other) => errors.push(format!(
                        "{label}: 'to.test_file' must be \"required\", got '{other}'"
                    )),
                    None => errors.push(format!("{label}: requires 'to.test_file: required'")),
                }
            }
            "class_complexity" => {
                require_role_selector(rule, "for", &label, errors);
                require_integer(rule, "max_public_methods", &label, errors);
                require_integer(rule, "max_properties", &label, errors);
            }
            "documentation_required" => {
                require_role_selector(rule, "for", &label, errors);
                require_integer(rule, "min_lines", &label, errors);
                if rule.get("requires_jsdoc").and_then(Value::as_bool).is_none() {
                    errors.push(format!(
                        "{label}: missing required boolean field 'requires_jsdoc'"
                    ));
                }
            }
            "forbidden_keywords" | "forbidden_patterns" => {
                require_role_selector(rule, "from", &label, errors);
                require_nonempty_string_list(rule, "contains_forbidden", &label, errors);
            }
            "barrel_purity" => {
                if rule
                    .get("for")
                    .and_then(|f| f.get("file_pattern"))
                    .and_then(Value::as_str)
                    .is_none()
                {
                    errors.push(format!(
                        "{label}: missing required string field 'for.file_pattern'"
                    ));
                }
                require_nonempty_string_list(rule, "contains_forbidden", &label, errors);
            }
            "required_structure" => {
                require_nonempty_string_list(rule, "required_directories", &label, errors);
            }
            "minimum_test_ratio" => {
                match rule.get("global").and_then(|g| g.get("test_ratio")).and_then(Value::as_f64) {
                    Some(r) if (0.0..=1.0).contains(&r) => {}
                    Some(r) => {
                        errors.push(format!("{label}: global.test_ratio {r} is outside [0, 1]"))
                    }
                    None => errors.push(format!(
                        "{label}: missing required number field 'global.test_ratio'"
                    )),
                }
            }
            "granularity_metric" => {
                for field in ["target_loc_per_file", "warning_threshold_multiplier"] {
                    match rule.get("global").and_then(|g| g.get(field)).and_then(Value::as_f64) {
                        Some(v) if v > 0.0 => {}
                        Some(_) => {
                            errors.push(format!("{label}: global.{field} must be positive"))
                        }
                        None => errors.push(format!(
                            "{label}: missing required number field 'global.{field}'"
                        )),
                    }
                }
            }
            // A tag the schema document allows but this build does not
            // recognize passes here; compilation rejects it later.
            _ => {}
        }
    }
}

fn require_role_selector(rule: &Value, selector: &str, label: &str, errors: &mut Vec<String>) {
    let role = rule.get(selector).and_then(|s| s.get("role"));
    let ok = matches!(role, Some(v) if v.as_str().is_some() || is_string_list(v));
    if !ok {
        errors.push(format!(
            "{label}: missing required field '{selector}.role' (role name, list, or ALL)"
        ));
    }
}

fn require_string(rule: &Value, field: &str, label: &str, errors: &mut Vec<String>) {
    if rule.get(field).and_then(Value::as_str).is_none() {
        errors.push(format!("{label}: missing required string field '{field}'"));
    }
}

fn require_integer(rule: &Value, field: &str, label: &str, errors: &mut Vec<String>) {
    if rule.get(field).and_then(Value::as_u64).is_none() {
        errors.push(format!("{label}: missing required integer field '{field}'"));
    }
}

fn require_nonempty_string_list(rule: &Value, field: &str, label: &str, errors: &mut Vec<String>) {
    match rule.get(field) {
        Some(value) if is_string_list(value) => {
            if value.as_sequence().is_some_and(|s| s.is_empty()) {
                errors.push(format!("{label}: '{field}' must not be empty"));
            }
        }
        Some(_) => errors.push(format!("{label}: '{field}' must be a list of strings")),
        None => errors.push(format!("{label}: missing required list field '{field}'")),
    }
}

fn is_string_list(value: &Value) -> bool {
    value
        .as_sequence()
        .is_some_and(|seq| seq.iter().all(|v| v.as_str().is_some()))
}

fn is_string_list_list(value: &Value) -> bool {
    value
        .as_sequence()
        .is_some_and(|seq| seq.iter().all(is_string_list))
}
