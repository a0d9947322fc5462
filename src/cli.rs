use crate::orchestrator;
use crate::reporter::{ReportFormat, Reporter};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "sitegen",
    version,
    about = "Static site build orchestrator with per-artifact outcome reporting"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the static site for deployment
    #[command(alias = "b")]
    Build(BuildArgs),
}

#[derive(Debug, Args, Clone)]
pub struct BuildArgs {
    /// The environment the build runs under (defaults to $SITEGEN_ENV, then production)
    #[arg(short, long)]
    pub environment: Option<String>,

    /// Keep orphaned files and empty directories in the build folder
    #[arg(long)]
    pub no_clean: bool,

    /// Build only sources matching this pattern (e.g. "**/*.css")
    #[arg(short, long)]
    pub glob: Option<String>,

    /// Print full error details for failed artifacts
    #[arg(long)]
    pub verbose: bool,

    /// Concurrency hint for artifact rendering
    #[arg(long, default_value_t = 4)]
    pub parallel: usize,

    /// Emit one JSON object per outcome instead of styled text
    #[arg(long)]
    pub json: bool,
}

impl BuildArgs {
    /// Resolve the effective environment name: flag, then `$SITEGEN_ENV`,
    /// then production.
    pub fn resolve_environment(&self) -> String {
        self.environment
            .clone()
            .or_else(|| std::env::var("SITEGEN_ENV").ok())
            .unwrap_or_else(|| "production".to_string())
    }
}

pub async fn run(args: Cli) -> Result<crate::model::RunOutcome> {
    match args.command {
        Command::Build(build) => {
            let format = if build.json {
                ReportFormat::Json
            } else {
                ReportFormat::Text
            };
            let reporter = Reporter::new(format, build.verbose);
            orchestrator::run_build(
                &build.resolve_environment(),
                !build.no_clean,
                build.glob.clone(),
                build.parallel,
                &reporter,
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_build(argv: &[&str]) -> BuildArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        let Command::Build(build) = cli.command;
        build
    }

    #[test]
    fn build_defaults() {
        let build = parse_build(&["sitegen", "build"]);
        assert!(!build.no_clean);
        assert!(!build.verbose);
        assert!(!build.json);
        assert_eq!(build.parallel, 4);
        assert!(build.glob.is_none());
    }

    #[test]
    fn build_alias_and_flags() {
        let build = parse_build(&[
            "sitegen",
            "b",
            "--no-clean",
            "--verbose",
            "-g",
            "**/*.css",
            "--parallel",
            "2",
        ]);
        assert!(build.no_clean);
        assert!(build.verbose);
        assert_eq!(build.glob.as_deref(), Some("**/*.css"));
        assert_eq!(build.parallel, 2);
    }

    #[test]
    fn environment_flag_wins() {
        let build = parse_build(&["sitegen", "build", "-e", "staging"]);
        assert_eq!(build.resolve_environment(), "staging");
    }
}
