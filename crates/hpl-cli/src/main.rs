mod tracing_init;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use hpl_config::{HplConfig, LoggingConfig};
use hpl_lang::{BatchDriver, BatchReport, HplParser, SpecHost};

use crate::tracing_init::init_tracing;

#[derive(Parser)]
#[command(name = "hplc", about = "HPL property frontend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one text and print its AST
    Parse {
        #[command(flatten)]
        form: Form,
        /// Topic schemas from this hpl.toml type field accesses
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// HPL text
        text: String,
    },
    /// Parse every property and assumption listed in a config file
    Check {
        /// Path to hpl.toml config file
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Which start rule to parse `text` against. Defaults to a property.
#[derive(Args)]
#[group(multiple = false)]
struct Form {
    #[arg(long)]
    property: bool,
    #[arg(long)]
    assumption: bool,
    #[arg(long)]
    predicate: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { form, config, text } => {
            let config = config.map(load_config).transpose()?;
            let _guard = match &config {
                Some((cfg, base_dir)) => init_tracing(&cfg.logging, base_dir)?,
                None => init_tracing(&LoggingConfig::default(), Path::new("."))?,
            };
            let parser = match &config {
                Some((cfg, _)) => HplParser::with_resolver(&cfg.topics),
                None => HplParser::new(),
            };
            let printed = if form.assumption {
                parser.parse_assumption(&text).map(|a| a.to_string())
            } else if form.predicate {
                parser.parse_predicate(&text).map(|p| p.to_string())
            } else {
                parser.parse_property(&text).map(|p| p.to_string())
            };
            match printed {
                Ok(ast) => {
                    println!("{ast}");
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("{e}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Check { config } => {
            let (cfg, base_dir) = load_config(config)?;
            let _guard = init_tracing(&cfg.logging, &base_dir)?;

            let parser = HplParser::with_resolver(&cfg.topics);
            let driver = BatchDriver::new(parser).with_policy(cfg.parser.syntax_errors.into());

            let mut report = BatchReport::default();
            for mut entity in cfg.entities() {
                let entity_report = driver
                    .run(&mut entity)
                    .map_err(|e| anyhow::anyhow!("{} '{}': {e}", entity.kind(), entity.name()))?;
                report.merge(entity_report);
            }

            for diagnostic in &report.diagnostics {
                eprintln!("{diagnostic}");
            }
            println!(
                "{} parsed, {} failed",
                report.parsed,
                report.diagnostics.len()
            );
            Ok(if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

/// Load `path` and return it with the directory relative paths resolve from.
fn load_config(path: PathBuf) -> Result<(HplConfig, PathBuf)> {
    let path = path
        .canonicalize()
        .map_err(|e| anyhow::anyhow!("config path '{}': {e}", path.display()))?;
    let config = HplConfig::load(&path)?;
    let base_dir = path
        .parent()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("config path '{}' has no parent", path.display()))?;
    Ok((config, base_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_forms_are_exclusive() {
        let cli = Cli::try_parse_from(["hplc", "parse", "--predicate", "x > 1"]).unwrap();
        let Commands::Parse { form, text, .. } = cli.command else {
            panic!("expected parse");
        };
        assert!(form.predicate && !form.property && !form.assumption);
        assert_eq!(text, "x > 1");

        assert!(Cli::try_parse_from(["hplc", "parse", "--property", "--predicate", "x"]).is_err());
    }

    #[test]
    fn check_requires_config() {
        assert!(Cli::try_parse_from(["hplc", "check"]).is_err());
        let cli = Cli::try_parse_from(["hplc", "check", "-c", "hpl.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::Check { config } if config == PathBuf::from("hpl.toml")));
    }
}
