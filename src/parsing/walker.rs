//! File system walker enumerating the source files of a project.
//!
//! This is the `Enumerator` collaborator: a flat, sorted, relative listing
//! used to seed the parser, pre-populate the content cache, and drive
//! project-level rules. Traversal supports .gitignore rules, custom ignore
//! patterns from configuration, extension filtering, and hidden-file
//! handling.

use crate::config::Settings;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct FileWalker {
    settings: Arc<Settings>,
}

impl FileWalker {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Walk a directory and return an iterator of source files to analyze.
    pub fn walk(&self, root: &Path) -> impl Iterator<Item = PathBuf> {
        let mut builder = WalkBuilder::new(root);

        builder
            .hidden(!self.settings.analysis.include_hidden)
            .git_ignore(self.settings.analysis.respect_gitignore)
            .git_global(self.settings.analysis.respect_gitignore)
            .git_exclude(self.settings.analysis.respect_gitignore)
            .follow_links(false)
            .require_git(false); // Allow gitignore to work in non-git directories

        // Custom ignore patterns as exclusion overrides
        let mut override_builder = ignore::overrides::OverrideBuilder::new(root);
        for pattern in &self.settings.analysis.ignore_patterns {
            if let Err(e) = override_builder.add(&format!("!{pattern}")) {
                tracing::warn!("invalid ignore pattern '{pattern}': {e}");
            }
        }
        if let Ok(overrides) = override_builder.build() {
            builder.overrides(overrides);
        }

        let extensions = self.settings.analysis.source_extensions.clone();
        builder
            .build()
            .filter_map(Result::ok) // Skip entries we can't access
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .filter_map(move |entry| {
                let path = entry.path();
                let matches = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| extensions.iter().any(|e| e == ext));
                matches.then(|| path.to_path_buf())
            })
    }

    /// Enumerate the project as sorted forward-slash paths relative to
    /// `root`. Sorting keeps every downstream consumer deterministic.
    pub fn list(&self, root: &Path) -> Vec<String> {
        let mut files: Vec<String> = self
            .walk(root)
            .filter_map(|path| {
                path.strip_prefix(root)
                    .ok()
                    .map(|rel| relative_to_forward_slash(rel))
            })
            .collect();
        files.sort();
        files
    }
}

/// Render a relative path with forward slashes regardless of platform.
fn relative_to_forward_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}
