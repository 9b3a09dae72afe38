//! zzshim CLI - drive a 7-Zip binary from the command line.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Result;
use anyhow::anyhow;
use clap::Parser;
use cli::Commands;
use commands::Session;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, checked before `RUST_LOG`.
const LOG_ENV: &str = "ZZSHIM_LOG";

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    init_tracing(cli.verbose, cli.quiet)?;

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
    let show_progress = !cli.json && !cli.quiet;
    let open = || Session::open(&cli.archiver_config(), &*formatter, show_progress);

    match &cli.command {
        Commands::Locate => commands::locate::execute(&open()?),
        Commands::Test(args) => commands::test::execute(args, &open()?),
        Commands::Extract(args) => commands::extract::execute(args, &open()?),
        Commands::Compress(args) => commands::compress::execute(args, &open()?),
        Commands::Add(args) => commands::add::execute(args, &open()?),
        Commands::AddString(args) => commands::add_string::execute(args, &open()?),
        Commands::AddDir(args) => commands::add_dir::execute(args, &open()?),
        Commands::Completion { shell } => {
            commands::completion::execute(*shell);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) -> Result<()> {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}
