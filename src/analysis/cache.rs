//! File content cache and the minimal file I/O seams behind it.
//!
//! File access is split into two single-operation interfaces so consumers
//! depend only on what they use: [`FileReader`] feeds the cache once per
//! invocation, [`FileExistenceChecker`] backs the directory checks of
//! project-level rules. Evaluators themselves only ever see the cache; a
//! miss means "no content inspected", never a disk read.

use indexmap::IndexMap;
use std::path::PathBuf;

/// Reads a project-relative file. `None` covers both absence and
/// unreadability; the distinction does not matter to rule evaluation.
pub trait FileReader {
    fn read(&self, path: &str) -> Option<String>;
}

/// Checks whether a project-relative path exists.
pub trait FileExistenceChecker {
    fn exists(&self, path: &str) -> bool;
}

/// Default adapter implementing both seams against the real file system,
/// rooted at the project directory.
pub struct FsAdapter {
    root: PathBuf,
}

impl FsAdapter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn absolute(&self, path: &str) -> PathBuf {
        let mut absolute = self.root.clone();
        absolute.extend(path.split('/'));
        absolute
    }
}

impl FileReader for FsAdapter {
    fn read(&self, path: &str) -> Option<String> {
        std::fs::read_to_string(self.absolute(path)).ok()
    }
}

impl FileExistenceChecker for FsAdapter {
    fn exists(&self, path: &str) -> bool {
        self.absolute(path).exists()
    }
}

/// In-memory mapping from relative forward-slash path to file content.
///
/// Populated eagerly once per invocation, before any content-inspecting
/// rule runs, and dropped with the invocation.
#[derive(Debug, Default)]
pub struct FileContentCache {
    contents: IndexMap<String, String>,
}

impl FileContentCache {
    /// Read every listed path through the reader. Paths the reader cannot
    /// produce are simply not cached.
    pub fn populate<I, S>(reader: &dyn FileReader, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut contents = IndexMap::new();
        for path in paths {
            let path = path.into();
            if let Some(text) = reader.read(&path) {
                contents.insert(path, text);
            }
        }
        Self { contents }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.contents.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Build a cache directly from (path, content) pairs.
    pub fn from_entries<I, P, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        Self {
            contents: entries
                .into_iter()
                .map(|(p, c)| (p.into(), c.into()))
                .collect(),
        }
    }
}

/// Existence checker over a fixed path set, for callers that must consult
/// an enumerated listing rather than the disk.
pub struct PathSetChecker<'a> {
    paths: &'a [String],
}

impl<'a> PathSetChecker<'a> {
    pub fn new(paths: &'a [String]) -> Self {
        Self { paths }
    }
}

impl FileExistenceChecker for PathSetChecker<'_> {
    fn exists(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_populate_skips_unreadable_paths() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/a.ts"), "export {}").unwrap();

        let adapter = FsAdapter::new(root);
        let cache =
            FileContentCache::populate(&adapter, ["src/a.ts".to_string(), "src/gone.ts".into()]);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("src/a.ts"), Some("export {}"));
        assert_eq!(cache.get("src/gone.ts"), None);
    }

    #[test]
    fn test_fs_adapter_exists_covers_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/domain")).unwrap();

        let adapter = FsAdapter::new(root);
        assert!(adapter.exists("src/domain"));
        assert!(!adapter.exists("src/application"));
    }

    #[test]
    fn test_cache_miss_is_absent_not_disk() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("on-disk.ts"), "content").unwrap();

        // Populated with an empty list: the on-disk file must stay invisible.
        let adapter = FsAdapter::new(temp_dir.path());
        let cache = FileContentCache::populate(&adapter, Vec::<String>::new());
        assert_eq!(cache.get("on-disk.ts"), None);
    }
}
