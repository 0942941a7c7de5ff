//! Synonym detection: flags pairs of files whose normalized names are
//! near-identical under Jaro-Winkler similarity.
//!
//! Normalization lowercases the file stem, strips conventional role
//! suffixes ("-service", "-repository", ...) to a fixpoint, and rewrites
//! thesaurus synonyms to their canonical group head. Running it twice
//! yields the same result as running it once.

use crate::grammar::Rule;
use crate::rules::RuleContext;
use crate::symbol::file_stem;
use crate::types::{RoleReference, Violation};
use std::collections::HashMap;

/// Conventional suffixes stripped from file stems before comparison.
const STRIP_SUFFIXES: [&str; 12] = [
    "usecase",
    "use-case",
    "implementation",
    "impl",
    "adapter",
    "repository",
    "controller",
    "service",
    "factory",
    "builder",
    "creator",
    "generator",
];

const SEPARATORS: [char; 3] = ['-', '_', '.'];

pub(crate) fn evaluate(
    rule: &Rule,
    scope: &RoleReference,
    threshold: f64,
    thesaurus: &[Vec<String>],
    ctx: &RuleContext,
) -> Vec<Violation> {
    let canonical = canonical_map(thesaurus);
    let files: Vec<(&str, String)> = ctx
        .files_in_scope(scope)
        .into_iter()
        .map(|(path, _)| (path, normalize(file_stem(path), &canonical)))
        .collect();

    let mut violations = Vec::new();
    for (i, (path_a, name_a)) in files.iter().enumerate() {
        for (path_b, name_b) in files.iter().skip(i + 1) {
            let score = strsim::jaro_winkler(name_a, name_b);
            if score >= threshold {
                violations.push(Violation::new(
                    &rule.name,
                    rule.severity,
                    *path_a,
                    format!(
                        "Files '{path_a}' and '{path_b}' look like synonyms \
                         (name similarity {score:.2})"
                    ),
                ));
            }
        }
    }
    violations
}

/// Non-first synonym → group head, lowercased.
fn canonical_map(thesaurus: &[Vec<String>]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for group in thesaurus {
        let Some(head) = group.first() else {
            continue;
        };
        for member in &group[1..] {
            map.insert(member.to_lowercase(), head.to_lowercase());
        }
    }
    map
}

/// Normalize a file stem for comparison. Idempotent: suffix stripping and
/// thesaurus rewriting are interleaved until nothing changes.
pub(crate) fn normalize(stem: &str, canonical: &HashMap<String, String>) -> String {
    let mut name = stem.to_lowercase();
    for _ in 0..8 {
        let stripped = strip_suffixes(&name);
        let rewritten = rewrite_tokens(&stripped, canonical);
        if rewritten == name {
            break;
        }
        name = rewritten;
    }
    name
}

fn strip_suffixes(name: &str) -> String {
    let mut name = name.to_string();
    loop {
        let before = name.len();
        for suffix in STRIP_SUFFIXES {
            if let Some(prefix) = name.strip_suffix(suffix) {
                name = prefix.trim_end_matches(SEPARATORS).to_string();
                break;
            }
        }
        if name.len() == before {
            return name;
        }
    }
}

/// Whole-word thesaurus substitution: alphanumeric runs are words,
/// separators pass through untouched.
fn rewrite_tokens(name: &str, canonical: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(name.len());
    let mut word = String::new();
    for c in name.chars() {
        if c.is_alphanumeric() {
            word.push(c);
        } else {
            flush_word(&mut out, &mut word, canonical);
            out.push(c);
        }
    }
    flush_word(&mut out, &mut word, canonical);
    out
}

fn flush_word(out: &mut String, word: &mut String, canonical: &HashMap<String, String>) {
    if word.is_empty() {
        return;
    }
    match canonical.get(word.as_str()) {
        Some(head) => out.push_str(head),
        None => out.push_str(word),
    }
    word.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{Fixture, rule, run};
    use crate::symbol::{Symbol, SymbolKind};

    fn no_thesaurus() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_jaro_winkler_reference_values() {
        assert!(strsim::jaro_winkler("MARTHA", "MARHTA") >= 0.96);
        assert!(strsim::jaro_winkler("DWAYNE", "DUANE") >= 0.82);
        assert_eq!(strsim::jaro_winkler("nooa", "nooa"), 1.0);
        assert_eq!(strsim::jaro_winkler("nooa", ""), 0.0);
        assert_eq!(
            strsim::jaro_winkler("grammar", "grampa"),
            strsim::jaro_winkler("grampa", "grammar")
        );
    }

    #[test]
    fn test_suffix_stripping_reaches_fixpoint() {
        let canonical = no_thesaurus();
        assert_eq!(normalize("user-service", &canonical), "user");
        assert_eq!(normalize("user-service-impl", &canonical), "user");
        assert_eq!(normalize("OrderUseCase", &canonical), "order");
        assert_eq!(normalize("plain", &canonical), "plain");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let mut canonical = HashMap::new();
        canonical.insert("store".to_string(), "repository".to_string());

        for stem in ["user-store", "user-service", "OrderUseCase", "plain", "x"] {
            let once = normalize(stem, &canonical);
            let twice = normalize(&once, &canonical);
            assert_eq!(once, twice, "normalize not idempotent for '{stem}'");
        }
    }

    #[test]
    fn test_thesaurus_rewrites_whole_words_only() {
        let mut canonical = HashMap::new();
        canonical.insert("repo".to_string(), "store".to_string());

        assert_eq!(normalize("user-repo", &canonical), "user-store");
        // "report" contains "repo" but is a different word
        assert_eq!(normalize("user-report", &canonical), "user-report");
    }

    #[test]
    fn test_synonym_pair_reported_once() {
        let fixture = Fixture::new(vec![
            Symbol::new("src/user-service.ts", "a", SymbolKind::File).with_role("SERVICE"),
            Symbol::new("src/user-repository.ts", "b", SymbolKind::File).with_role("SERVICE"),
            Symbol::new("src/billing.ts", "c", SymbolKind::File).with_role("SERVICE"),
        ]);
        let thesaurus = vec![vec!["service".to_string(), "repository".to_string()]];
        let violations = run(&fixture, |ctx| {
            evaluate(&rule("synonyms"), &RoleReference::All, 0.9, &thesaurus, ctx)
        });

        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("user-service.ts"));
        assert!(violations[0].message.contains("user-repository.ts"));
    }

    #[test]
    fn test_dissimilar_names_not_reported() {
        let fixture = Fixture::new(vec![
            Symbol::new("src/billing.ts", "a", SymbolKind::File).with_role("SERVICE"),
            Symbol::new("src/shipping.ts", "b", SymbolKind::File).with_role("SERVICE"),
        ]);
        let violations = run(&fixture, |ctx| {
            evaluate(&rule("synonyms"), &RoleReference::All, 0.95, &[], ctx)
        });

        assert!(violations.is_empty());
    }
}
