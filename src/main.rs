use anyhow::Context;
use clap::{Parser, Subcommand};
use nooa::report::{self, ExitCode, OutputFormat};
use nooa::{Analyzer, GrammarLoader, Settings};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "nooa")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Architectural grammar linter for source trees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a project against its architectural grammar
    Check {
        /// Path to the project root
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Explicit grammar file (skips discovery under the project root)
        #[arg(long)]
        grammar: Option<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Write a starter grammar and settings file
    Init {
        /// Force overwrite of existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Config,
}

const STARTER_GRAMMAR: &str = r#"# Architectural grammar for this project.
# Roles bucket files by path (first match wins); rules govern the roles.
version: "1.0"
language: typescript

roles:
  - name: DOMAIN
    path: "^src/domain/"
    description: Business logic, free of infrastructure concerns
  - name: INFRA
    path: "^src/infra/"
    description: Databases, transports, frameworks

rules:
  - name: domain-stays-pure
    severity: error
    rule: forbidden
    from:
      role: DOMAIN
    to:
      role: INFRA

  - name: no-dependency-cycles
    severity: error
    rule: forbidden
    from:
      role: ALL
    to:
      circular: true
"#;

fn main() {
    let cli = Cli::parse();

    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        eprintln!("Falling back to default configuration.");
        Settings::default()
    });
    nooa::logging::init_with_config(&settings.logging);

    let code = match cli.command {
        Commands::Check {
            path,
            grammar,
            format,
        } => run_check(settings, &path, grammar, format),
        Commands::Init { force } => match run_init(force) {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("Error: {e:#}");
                ExitCode::Fatal
            }
        },
        Commands::Config => {
            match toml::to_string_pretty(&settings) {
                Ok(toml_str) => {
                    print!("{toml_str}");
                    ExitCode::Success
                }
                Err(e) => {
                    eprintln!("Error displaying config: {e}");
                    ExitCode::Fatal
                }
            }
        }
    };

    std::process::exit(code.code());
}

fn run_check(
    settings: Settings,
    path: &PathBuf,
    grammar: Option<PathBuf>,
    format: OutputFormat,
) -> ExitCode {
    let settings = Arc::new(settings);
    let analyzer = match Analyzer::new(settings.clone()) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::Fatal;
        }
    };

    let mut analyzer = match grammar {
        Some(grammar_path) => {
            analyzer.with_loader(GrammarLoader::new().with_grammar_file(grammar_path))
        }
        None => analyzer,
    };

    match analyzer.analyze(path) {
        Ok(violations) => {
            let files = nooa::parsing::FileWalker::new(settings).list(path);
            match format {
                OutputFormat::Text => print!("{}", report::render_text(&violations, files.len())),
                OutputFormat::Json => {
                    println!("{}", report::render_json(&violations, files.len()))
                }
            }
            ExitCode::from_violations(&violations)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            for suggestion in e.recovery_suggestions() {
                eprintln!("  hint: {suggestion}");
            }
            ExitCode::Fatal
        }
    }
}

fn run_init(force: bool) -> anyhow::Result<()> {
    let grammar_path = PathBuf::from("nooa.grammar.yaml");
    if grammar_path.exists() && !force {
        anyhow::bail!(
            "'{}' already exists. Use --force to overwrite",
            grammar_path.display()
        );
    }
    std::fs::write(&grammar_path, STARTER_GRAMMAR)
        .with_context(|| format!("failed to write '{}'", grammar_path.display()))?;
    println!("Created starter grammar at: {}", grammar_path.display());

    let config_path = Settings::init_config_file(force)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("failed to write settings file")?;
    println!("Created configuration file at: {}", config_path.display());
    println!("Edit these files to describe your architecture.");
    Ok(())
}
