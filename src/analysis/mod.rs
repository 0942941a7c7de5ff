//! The analysis pipeline: grammar load → parse → role assignment → cache
//! fill → rule dispatch → collection.
//!
//! One invocation is a single batch. Everything the evaluators see
//! (grammar, roled symbols, cache, file listing) is constructed up front
//! and then read-only; the final violation list is stable-sorted so two
//! runs over the same inputs are byte-identical.

pub mod cache;
pub mod graph;
pub mod roles;

pub use cache::{FileContentCache, FileExistenceChecker, FileReader, FsAdapter};
pub use graph::DependencyGraph;
pub use roles::RoleAssigner;

use crate::config::Settings;
use crate::error::{AnalyzeError, AnalyzeResult};
use crate::grammar::GrammarLoader;
use crate::parsing::{CodeParser, FileWalker, TypeScriptParser};
use crate::rules::{self, RuleContext};
use crate::types::Violation;
use std::path::Path;
use std::sync::Arc;

pub struct Analyzer {
    settings: Arc<Settings>,
    loader: GrammarLoader,
    parser: Box<dyn CodeParser>,
}

impl Analyzer {
    /// Analyzer with the default collaborators: grammar discovery under the
    /// project root and the tree-sitter TypeScript parser.
    pub fn new(settings: Arc<Settings>) -> AnalyzeResult<Self> {
        let parser = TypeScriptParser::new(settings.clone())?;
        Ok(Self {
            settings,
            loader: GrammarLoader::new(),
            parser: Box::new(parser),
        })
    }

    /// Replace the grammar loader (explicit grammar or schema paths).
    pub fn with_loader(mut self, loader: GrammarLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Replace the source parser collaborator.
    pub fn with_parser(mut self, parser: Box<dyn CodeParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Run the full batch against a project and return its violations,
    /// sorted by (rule name, file, message).
    pub fn analyze(&mut self, project_root: &Path) -> AnalyzeResult<Vec<Violation>> {
        if !project_root.is_dir() {
            return Err(AnalyzeError::InvalidRoot {
                root: project_root.to_path_buf(),
            });
        }

        let grammar = self.loader.load(project_root)?;
        let symbols = self.parser.parse(project_root)?;

        let assigner = RoleAssigner::new(&grammar);
        let symbols = assigner.assign(&symbols);
        for role in &grammar.roles {
            if !symbols.iter().any(|s| s.role == role.name) {
                tracing::debug!("role '{}' matched no file", role.name);
            }
        }

        let files = FileWalker::new(self.settings.clone()).list(project_root);
        let adapter = FsAdapter::new(project_root);
        let cache = FileContentCache::populate(&adapter, files.iter().cloned());
        tracing::debug!(
            files = files.len(),
            cached = cache.len(),
            "content cache populated"
        );

        let ctx = RuleContext {
            symbols: &symbols,
            cache: &cache,
            files: &files,
            existence: &adapter,
        };
        let mut violations = rules::dispatch(&grammar, &ctx);

        violations.sort_by(|a, b| {
            a.rule_name
                .cmp(&b.rule_name)
                .then_with(|| a.file.cmp(&b.file))
                .then_with(|| a.message.cmp(&b.message))
        });

        tracing::info!(
            violations = violations.len(),
            "analysis of {} complete",
            project_root.display()
        );
        Ok(violations)
    }
}
