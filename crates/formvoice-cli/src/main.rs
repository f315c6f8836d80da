//! CLI entry point - the composition root.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use formvoice_cli::{Cli, CliError, Commands, handlers, resolve_config};

fn init_tracing(verbose: bool) {
    // Logs go to stderr so the transcript on stdout stays readable.
    let default = if verbose { "formvoice=debug" } else { "formvoice=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: &Cli, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Fields { document } => handlers::fields::execute(&document),
        Commands::Config => handlers::config::execute(&resolve_config(cli)?),
        Commands::Run(args) => {
            let config = resolve_config(cli)?;
            let path = handlers::run::execute(config, args).await?;
            println!("✓ Saved {}", path.display());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads its `env` fallbacks
    dotenvy::dotenv().ok();

    let mut cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command.take() else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Err(err) = dispatch(&cli, command).await {
        tracing::error!(error = %err, "Command failed");
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
    Ok(())
}
