//! Layered settings for the linter.
//!
//! Precedence, lowest to highest: built-in defaults, the workspace
//! `.nooa/settings.toml`, then `NOOA_`-prefixed environment variables.
//! Nested fields are addressed in the environment with double
//! underscores:
//!
//! ```bash
//! NOOA_ANALYSIS__INCLUDE_HIDDEN=true nooa check .
//! NOOA_LOGGING__DEFAULT=debug nooa check .
//! ```
//!
//! The grammar document is deliberately not part of these settings; it
//! describes the analyzed project, while settings describe how this tool
//! runs.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Per-workspace directory the settings file lives in.
const CONFIG_DIR: &str = ".nooa";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Settings schema version
    pub version: u32,

    /// Source enumeration and analysis options
    pub analysis: AnalysisConfig,

    /// Diagnostic logging levels
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Extensions a file must carry to be analyzed
    pub source_extensions: Vec<String>,

    /// Glob patterns excluded from enumeration
    pub ignore_patterns: Vec<String>,

    /// Traverse hidden files and directories
    pub include_hidden: bool,

    /// Honor .gitignore files during enumeration
    pub respect_gitignore: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when `RUST_LOG` is absent
    pub default: String,

    /// Per-module level overrides, e.g. `"nooa::rules" = "debug"`
    pub modules: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            analysis: AnalysisConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            source_extensions: vec!["ts".to_string(), "tsx".to_string()],
            ignore_patterns: vec![
                "node_modules/**".to_string(),
                "dist/**".to_string(),
                "build/**".to_string(),
                "coverage/**".to_string(),
                ".git/**".to_string(),
            ],
            include_hidden: false,
            respect_gitignore: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: "warn".to_string(),
            modules: HashMap::new(),
        }
    }
}

impl Settings {
    /// Effective settings for the surrounding workspace. Missing files are
    /// fine; every layer above the defaults is optional.
    pub fn load() -> Result<Self, figment::Error> {
        let file = match Self::workspace_dir() {
            Some(dir) => dir.join(SETTINGS_FILE),
            None => PathBuf::from(CONFIG_DIR).join(SETTINGS_FILE),
        };
        Self::layered(&file).extract()
    }

    /// Settings from an explicit file instead of workspace discovery.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Self::layered(path.as_ref()).extract()
    }

    /// The one figment stack both load paths share.
    fn layered(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("NOOA_").split("__"))
    }

    /// Nearest ancestor of the working directory that carries a `.nooa`
    /// directory. None outside any workspace.
    fn workspace_dir() -> Option<PathBuf> {
        let start = std::env::current_dir().ok()?;
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_DIR))
            .find(|candidate| candidate.is_dir())
    }

    /// Render these settings as TOML at `path`, creating parent
    /// directories as needed.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let rendered = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, rendered)
    }

    /// Write a fresh settings file under `.nooa/`, refusing to clobber an
    /// existing one unless `force` is set.
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = PathBuf::from(CONFIG_DIR).join(SETTINGS_FILE);
        if path.exists() && !force {
            return Err(format!(
                "refusing to overwrite existing '{}' (pass --force to replace it)",
                path.display()
            )
            .into());
        }
        Self::default().write_to(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.analysis.source_extensions, vec!["ts", "tsx"]);
        assert!(settings.analysis.respect_gitignore);
        assert_eq!(settings.logging.default, "warn");
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        let toml_content = r#"
version = 2

[analysis]
source_extensions = ["ts"]
include_hidden = true

[logging]
default = "debug"
"#;
        fs::write(&config_path, toml_content).unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(settings.version, 2);
        assert_eq!(settings.analysis.source_extensions, vec!["ts"]);
        assert!(settings.analysis.include_hidden);
        assert_eq!(settings.logging.default, "debug");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        fs::write(&config_path, "[analysis]\ninclude_hidden = true\n").unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert!(settings.analysis.include_hidden);
        // Untouched values fall back to defaults
        assert_eq!(settings.version, 1);
        assert!(settings.analysis.respect_gitignore);
        assert!(
            settings
                .analysis
                .ignore_patterns
                .iter()
                .any(|p| p.contains("node_modules"))
        );
    }

    #[test]
    fn test_write_to_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        let mut settings = Settings::default();
        settings.analysis.source_extensions = vec!["ts".to_string()];
        settings.write_to(&config_path).unwrap();

        let loaded = Settings::load_from(&config_path).unwrap();
        assert_eq!(loaded.analysis.source_extensions, vec!["ts"]);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from(temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.version, 1);
    }
}
