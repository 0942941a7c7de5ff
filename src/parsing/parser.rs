//! Source parser contract.
//!
//! The engine depends only on this interface: a parser turns a project tree
//! into the flat symbol list defined in [`crate::symbol`]. The default
//! implementation is [`crate::parsing::TypeScriptParser`]; anything that
//! honors the contract can stand in (tests use canned symbol lists).

use crate::error::AnalyzeResult;
use crate::symbol::Symbol;
use std::path::Path;

/// Common interface for source parsers.
pub trait CodeParser {
    /// Parse the project and return one or more symbols per source file.
    ///
    /// Contract:
    /// - `Symbol.path` is forward-slash normalized and relative to
    ///   `project_root`;
    /// - `Symbol.dependencies` only contains paths that appear in the
    ///   returned symbol set (imports resolving outside the project are
    ///   dropped);
    /// - a file with no tracked exports yields exactly one file-level
    ///   symbol named after the file stem.
    fn parse(&mut self, project_root: &Path) -> AnalyzeResult<Vec<Symbol>>;
}
