pub mod analysis;
pub mod config;
pub mod error;
pub mod grammar;
pub mod logging;
pub mod parsing;
pub mod report;
pub mod rules;
pub mod symbol;
pub mod types;

pub use analysis::{Analyzer, FileContentCache, FileExistenceChecker, FileReader, RoleAssigner};
pub use config::Settings;
pub use error::{AnalyzeError, AnalyzeResult, GrammarError, GrammarResult};
pub use grammar::{Grammar, GrammarLoader, Rule, RuleKind};
pub use parsing::{CodeParser, TypeScriptParser};
pub use report::{ExitCode, OutputFormat};
pub use symbol::{Symbol, SymbolKind};
pub use types::{RoleReference, Severity, Violation};
