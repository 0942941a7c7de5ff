//! The architectural grammar: roles assigned by path pattern, and a closed
//! set of rules evaluated over the roled symbol graph.
//!
//! A `Grammar` is built once by [`GrammarLoader`] and shared read-only for
//! the rest of the invocation. Every pattern it carries is compiled during
//! loading; evaluators never compile regexes.

pub mod loader;
pub mod schema;
pub mod validate;

pub use loader::GrammarLoader;

use crate::types::{RoleReference, Severity};
use regex::Regex;

/// A role declaration. Files are bucketed by first match over these
/// patterns, in declaration order.
#[derive(Debug, Clone)]
pub struct RoleDefinition {
    pub name: String,
    /// Pattern source text, kept for messages.
    pub path: String,
    pub pattern: Regex,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyMode {
    Allowed,
    Forbidden,
    Required,
}

/// What a dependency rule is checked against: a role set, or the cycle
/// detector.
#[derive(Debug, Clone)]
pub enum DependencyTarget {
    Roles(RoleReference),
    Circular,
}

/// The closed set of rule kinds. New kinds are added here and in the
/// dispatcher; there is no open registry.
#[derive(Debug, Clone)]
pub enum RuleKind {
    Dependency {
        mode: DependencyMode,
        from: RoleReference,
        target: DependencyTarget,
    },
    NamingPattern {
        scope: RoleReference,
        pattern: Regex,
    },
    FindSynonyms {
        scope: RoleReference,
        threshold: f64,
        thesaurus: Vec<Vec<String>>,
    },
    DetectUnreferenced {
        scope: RoleReference,
        ignore: Vec<Regex>,
    },
    FileSize {
        scope: RoleReference,
        max_lines: usize,
    },
    TestCoverage {
        from: RoleReference,
    },
    ClassComplexity {
        scope: RoleReference,
        max_public_methods: usize,
        max_properties: usize,
    },
    DocumentationRequired {
        scope: RoleReference,
        min_lines: usize,
        requires_jsdoc: bool,
    },
    ForbiddenKeywords {
        from: RoleReference,
        keywords: Vec<String>,
    },
    ForbiddenPatterns {
        from: RoleReference,
        patterns: Vec<Regex>,
    },
    BarrelPurity {
        file_pattern: Regex,
        forbidden: Vec<Regex>,
    },
    RequiredStructure {
        directories: Vec<String>,
    },
    MinimumTestRatio {
        ratio: f64,
    },
    GranularityMetric {
        target_loc_per_file: f64,
        warning_threshold_multiplier: f64,
    },
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub severity: Severity,
    pub comment: Option<String>,
    pub kind: RuleKind,
}

/// The immutable rule document loaded at the start of analysis.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub version: String,
    pub language: String,
    pub roles: Vec<RoleDefinition>,
    pub rules: Vec<Rule>,
}
