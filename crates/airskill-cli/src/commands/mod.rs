use clap::{Parser, Subcommand};
use std::path::PathBuf;

use airskill_config::ConfigLoader;
use airskill_core::AirskillError;

mod build;
mod discover;
mod ingest;

/// AirSkill: build, ingest and verify a published skill manifest for AI agents
#[derive(Parser)]
#[command(name = "airskill", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to airskill.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write every group index and the published manifest page
    Build,
    /// Distill a local repository into 3-5 skills under one group, then rebuild
    Ingest {
        /// Local repository directory
        path: PathBuf,
        /// Group name (default: the group the model proposes, else the directory name)
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Check that every skill document is reachable from the published manifest
    Discover {
        /// Skip asking the generation service to enumerate the links
        #[arg(long)]
        no_probe: bool,
    },
    /// Show current configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Run the selected command and return the process exit code.
    pub async fn run(self) -> airskill_core::Result<i32> {
        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref())?;
        let config = config_loader.get();

        // Resolve log level: --verbose > --quiet > --log-level > config
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level
                .as_deref()
                .unwrap_or(config.logging.level.as_str())
        };

        if config.logging.format == "json" {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
                )
                .json()
                .with_target(true)
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
                )
                .with_target(false)
                .init();
        }

        match self.command {
            Commands::Build => build::cmd_build(config).await.map(|_| 0),
            Commands::Ingest { path, group } => {
                ingest::cmd_ingest(config, &path, group.as_deref(), config_loader.path())
                    .await
                    .map(|_| 0)
            }
            Commands::Discover { no_probe } => discover::cmd_discover(config, no_probe).await,
            Commands::Config { json } => Self::cmd_config(config, json).map(|_| 0),
        }
    }

    fn cmd_config(config: airskill_config::AirskillConfig, json: bool) -> airskill_core::Result<()> {
        let shown = config.redacted();
        if json {
            println!("{}", serde_json::to_string_pretty(&shown)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&shown).map_err(|e| AirskillError::Config(e.to_string()))?
            );
        }
        if let Ok(warnings) = config.validate() {
            for w in warnings {
                eprintln!("{w}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_ingest_with_group() {
        let cli = Cli::try_parse_from(["airskill", "ingest", "../repo", "-g", "resilience"]).unwrap();
        match cli.command {
            Commands::Ingest { path, group } => {
                assert_eq!(path, PathBuf::from("../repo"));
                assert_eq!(group.as_deref(), Some("resilience"));
            }
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["airskill", "discover", "--no-probe", "--config", "x.toml", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(cli.command, Commands::Discover { no_probe: true }));
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["airskill", "build", "-v", "-q"]).is_err());
    }

    #[test]
    fn ingest_requires_path() {
        assert!(Cli::try_parse_from(["airskill", "ingest"]).is_err());
    }
}
