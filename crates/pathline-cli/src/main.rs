//! pathline entry point.

mod args;
mod prompt;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pathline_core::config::MatchConfig;
use pathline_core::errors::MatchResult;
use pathline_match::{FixedPrompt, MatchEngine, MatchOutcome};

use crate::args::{Cli, Command, MatchArgs};
use crate::prompt::ConsolePrompt;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Command::Match(args) => run_match(&args),
    };

    match outcome {
        Ok(MatchOutcome::Completed(summary)) => {
            tracing::info!(
                pathways = summary.n_pathways,
                clusters = summary.n_clusters,
                "match run complete"
            );
            ExitCode::SUCCESS
        }
        Ok(MatchOutcome::Aborted) => {
            tracing::warn!("match run aborted, nothing exported");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run_match(args: &MatchArgs) -> MatchResult<MatchOutcome> {
    let overrides = args.overrides();
    let config = MatchConfig::load(args.config.as_deref(), Some(&overrides))?;
    let engine = MatchEngine::new(config);

    // A configured cluster count makes the run fully non-interactive.
    match engine.config().n_clusters {
        Some(n) => engine.run(&mut FixedPrompt { n_clusters: n }),
        None => engine.run(&mut ConsolePrompt::stdin()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_configured_cluster_count_runs_headless() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("extracted.json");
        // raw extracted records: target-first frames, weight in the last column
        std::fs::write(
            &input,
            r#"[
                [[2, 0, 1, 0.0, 0.6], [1, 0, 0, 0.0, 0.6]],
                [[2, 1, 1, 0.0, 0.4], [1, 1, 0, 0.0, 0.4]]
            ]"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "pathline",
            "match",
            "-i",
            input.to_str().unwrap(),
            "--out-dir",
            dir.path().to_str().unwrap(),
            "-n",
            "1",
            "--no-dendrogram",
        ])
        .unwrap();
        let Command::Match(args) = cli.command;

        let outcome = run_match(&args).unwrap();
        let summary = match outcome {
            MatchOutcome::Completed(summary) => summary,
            MatchOutcome::Aborted => panic!("expected a completed run"),
        };
        assert_eq!(summary.labels, vec![1, 1]);
        assert!(dir.path().join("representative_weights.txt").exists());
        assert!(dir.path().join("reassigned.json").exists());
    }
}
