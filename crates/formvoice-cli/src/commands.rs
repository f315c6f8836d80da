//! Subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use formvoice_core::RunMode;

#[derive(Subcommand)]
pub enum Commands {
    /// List the fillable fields of a form document, in the order they are asked
    Fields {
        /// Path to the JSON form document
        document: PathBuf,
    },

    /// Fill a form document through the console
    Run(RunArgs),

    /// Print the effective dialogue settings as JSON
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to the JSON form document
    pub document: PathBuf,

    /// How answers are obtained: manual (typed), auto, or demo (scripted)
    #[arg(short, long, default_value = "manual", value_parser = parse_mode)]
    pub mode: RunMode,

    /// JSON object of scripted answers for demo mode (default: grain receipt)
    #[arg(long)]
    pub answers: Option<PathBuf>,

    /// Where to write the filled document (default: filled_<name> next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Extra delay after each spoken line, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub pace_ms: u64,
}

fn parse_mode(value: &str) -> Result<RunMode, String> {
    RunMode::parse(value).ok_or_else(|| format!("unknown mode '{value}' (expected manual, auto or demo)"))
}
