//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Fill form documents by voice, one field at a time.
#[derive(Parser)]
#[command(name = "formvoice")]
#[command(about = "Fill form documents through a spoken question-and-answer dialogue")]
#[command(version)]
pub struct Cli {
    /// JSON settings file (timing and phrasing)
    #[arg(long, global = true, env = "FORMVOICE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pause between an applied answer and the next question, in milliseconds
    #[arg(long, global = true, env = "FORMVOICE_ADVANCE_DWELL_MS")]
    pub advance_dwell_ms: Option<u64>,

    /// Simulated thinking time before a demo answer, in milliseconds
    #[arg(long, global = true, env = "FORMVOICE_DEMO_THINK_MS")]
    pub demo_think_ms: Option<u64>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use formvoice_core::RunMode;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_args() {
        let cli = Cli::parse_from([
            "formvoice",
            "run",
            "receipt.json",
            "--mode",
            "demo",
            "--advance-dwell-ms",
            "0",
        ]);
        assert_eq!(cli.advance_dwell_ms, Some(0));
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.mode, RunMode::Demo);
        assert_eq!(args.document, PathBuf::from("receipt.json"));
        assert!(args.output.is_none());
    }

    #[test]
    fn test_mode_defaults_to_manual() {
        let cli = Cli::parse_from(["formvoice", "run", "form.json"]);
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.mode, RunMode::Manual);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let result = Cli::try_parse_from(["formvoice", "run", "form.json", "--mode", "idle"]);
        assert!(result.is_err());
    }
}
