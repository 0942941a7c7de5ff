//! Shared value types: severities, role references, and violations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role name assigned to files no declared role pattern matches.
pub const UNKNOWN_ROLE: &str = "UNKNOWN";

/// Meta-token that makes a role reference match every role, `UNKNOWN` included.
pub const ALL_ROLES: &str = "ALL";

/// How serious a violation is. Any `Error` in the final report makes the
/// CLI exit non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// Role selector used by rules: the `ALL` meta-token, or an ordered set of
/// declared role names (a bare string in YAML is a set of one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleReference {
    All,
    Roles(Vec<String>),
}

impl RoleReference {
    /// Whether the given role satisfies this reference.
    pub fn matches(&self, role: &str) -> bool {
        match self {
            Self::All => true,
            Self::Roles(roles) => roles.iter().any(|r| r == role),
        }
    }

    /// The role names this reference was declared with (empty for `ALL`).
    pub fn names(&self) -> &[String] {
        match self {
            Self::All => &[],
            Self::Roles(roles) => roles,
        }
    }
}

impl fmt::Display for RoleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{ALL_ROLES}"),
            Self::Roles(roles) => write!(f, "{}", roles.join(", ")),
        }
    }
}

/// A single failed rule evaluation against a specific file.
///
/// Violations are plain values: the pipeline only ever creates and collects
/// them, never mutates or reuses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule_name: String,
    pub severity: Severity,
    pub file: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,
}

impl Violation {
    pub fn new(
        rule_name: impl Into<String>,
        severity: Severity,
        file: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_name: rule_name.into(),
            severity,
            file: file.into(),
            message: message.into(),
            from_role: None,
            to_role: None,
            dependency: None,
        }
    }

    pub fn with_from_role(mut self, role: impl Into<String>) -> Self {
        self.from_role = Some(role.into());
        self
    }

    pub fn with_to_role(mut self, role: impl Into<String>) -> Self {
        self.to_role = Some(role.into());
        self
    }

    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependency = Some(dependency.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Info.to_string(), "info");
    }

    #[test]
    fn test_severity_deserializes_lowercase() {
        let s: Severity = serde_yaml::from_str("warning").unwrap();
        assert_eq!(s, Severity::Warning);
        assert!(serde_yaml::from_str::<Severity>("fatal").is_err());
    }

    #[test]
    fn test_role_reference_matches() {
        let all = RoleReference::All;
        assert!(all.matches("DOMAIN"));
        assert!(all.matches(UNKNOWN_ROLE));

        let some = RoleReference::Roles(vec!["DOMAIN".into(), "INFRA".into()]);
        assert!(some.matches("DOMAIN"));
        assert!(some.matches("INFRA"));
        assert!(!some.matches("PRESENTATION"));
        assert!(!some.matches(UNKNOWN_ROLE));
    }

    #[test]
    fn test_violation_builders() {
        let v = Violation::new("no-db-in-domain", Severity::Error, "src/domain/u.ts", "nope")
            .with_from_role("DOMAIN")
            .with_to_role("INFRA")
            .with_dependency("src/infra/db.ts");

        assert_eq!(v.from_role.as_deref(), Some("DOMAIN"));
        assert_eq!(v.to_role.as_deref(), Some("INFRA"));
        assert_eq!(v.dependency.as_deref(), Some("src/infra/db.ts"));
    }
}
