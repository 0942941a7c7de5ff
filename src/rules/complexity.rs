//! Class complexity rule: caps on public methods and member properties.
//!
//! Classes are scanned lexically from cached content. The scanner tracks
//! strings and comments while brace-matching, so braces in literals do not
//! derail the class body extent; beyond that it stays a line-level
//! heuristic, which is all a lexical linter promises.

use crate::grammar::Rule;
use crate::rules::RuleContext;
use crate::types::{RoleReference, Violation};
use regex::Regex;
use std::sync::LazyLock;

static CLASS_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+([A-Za-z_$][\w$]*)")
        .expect("class head regex")
});

static METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:public\s+|protected\s+|private\s+|static\s+|async\s+|abstract\s+|override\s+)*(?:get\s+|set\s+)?([A-Za-z_$][\w$]*)\s*(?:<[^>]*>)?\s*\(",
    )
    .expect("method regex")
});

static PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:public\s+|protected\s+|private\s+|static\s+|readonly\s+|abstract\s+|override\s+)*([A-Za-z_$][\w$]*)\s*[?!]?\s*[:=]",
    )
    .expect("property regex")
});

#[derive(Debug, PartialEq, Eq)]
struct ClassShape {
    name: String,
    public_methods: usize,
    properties: usize,
}

pub(crate) fn evaluate(
    rule: &Rule,
    scope: &RoleReference,
    max_public_methods: usize,
    max_properties: usize,
    ctx: &RuleContext,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (path, role) in ctx.files_in_scope(scope) {
        let Some(content) = ctx.cache.get(path) else {
            continue;
        };
        for class in scan_classes(content) {
            if class.public_methods > max_public_methods || class.properties > max_properties {
                violations.push(
                    Violation::new(
                        &rule.name,
                        rule.severity,
                        path,
                        format!(
                            "Class '{}' has {} public methods (max {max_public_methods}) \
                             and {} properties (max {max_properties})",
                            class.name, class.public_methods, class.properties
                        ),
                    )
                    .with_from_role(role),
                );
            }
        }
    }
    violations
}

fn scan_classes(content: &str) -> Vec<ClassShape> {
    let mut classes = Vec::new();
    for captures in CLASS_HEAD.captures_iter(content) {
        let name = captures[1].to_string();
        let head_end = captures.get(0).expect("whole match").end();
        let Some(body) = class_body(&content[head_end..]) else {
            continue;
        };

        let (mut public_methods, mut properties) = (0, 0);
        for line in member_lines(body) {
            let trimmed = line.trim_start();
            if trimmed.is_empty()
                || trimmed.starts_with("//")
                || trimmed.starts_with('*')
                || trimmed.starts_with("/*")
                || trimmed.starts_with('@')
                || trimmed.starts_with('}')
            {
                continue;
            }
            if let Some(method) = METHOD.captures(trimmed) {
                let hidden = trimmed.starts_with("private") || trimmed.starts_with("protected");
                if !hidden && &method[1] != "constructor" {
                    public_methods += 1;
                }
            } else if PROPERTY.is_match(trimmed) {
                properties += 1;
            }
        }

        classes.push(ClassShape {
            name,
            public_methods,
            properties,
        });
    }
    classes
}

/// The text between the class's braces, found by brace matching that skips
/// strings, template literals, and comments.
fn class_body(after_head: &str) -> Option<&str> {
    let bytes = after_head.as_bytes();
    let open = after_head.find('{')?;
    let mut depth = 0usize;
    let mut state = Lex::Code;
    let mut i = open;

    while i < bytes.len() {
        let c = bytes[i];
        match state {
            Lex::Code => match c {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&after_head[open + 1..i]);
                    }
                }
                b'\'' => state = Lex::Single,
                b'"' => state = Lex::Double,
                b'`' => state = Lex::Template,
                b'/' if bytes.get(i + 1) == Some(&b'/') => state = Lex::LineComment,
                b'/' if bytes.get(i + 1) == Some(&b'*') => state = Lex::BlockComment,
                _ => {}
            },
            Lex::Single => match c {
                b'\\' => i += 1,
                b'\'' | b'\n' => state = Lex::Code,
                _ => {}
            },
            Lex::Double => match c {
                b'\\' => i += 1,
                b'"' | b'\n' => state = Lex::Code,
                _ => {}
            },
            Lex::Template => match c {
                b'\\' => i += 1,
                b'`' => state = Lex::Code,
                _ => {}
            },
            Lex::LineComment => {
                if c == b'\n' {
                    state = Lex::Code;
                }
            }
            Lex::BlockComment => {
                if c == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    i += 1;
                    state = Lex::Code;
                }
            }
        }
        i += 1;
    }
    None
}

#[derive(Clone, Copy)]
enum Lex {
    Code,
    Single,
    Double,
    Template,
    LineComment,
    BlockComment,
}

/// Lines of the class body that start at member level, i.e. not inside a
/// method or initializer block.
fn member_lines(body: &str) -> impl Iterator<Item = &str> {
    let mut depth = 0isize;
    body.lines().filter(move |line| {
        let at_member_level = depth == 0;
        for c in line.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
        }
        at_member_level
    })
}
