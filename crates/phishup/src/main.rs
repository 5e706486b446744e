//! phishup binary entry point.
//!
//! Boundary responsibilities only: tracing init, argument parsing, the
//! preflight gate, racing the flow against signals, and mapping any
//! failure to exit code 1.

use std::process;

use clap::ArgMatches;

use phishup::{cli, install, InstallOptions};
use phishup_core::prompt::ConsolePrompt;
use phishup_core::{preflight, shutdown};

async fn run_app(matches: &ArgMatches) -> anyhow::Result<()> {
    preflight::check_root()?;
    preflight::check_tools()?;

    let opts = InstallOptions::from_matches(matches);
    let mut prompt = ConsolePrompt;
    install::run(&opts, &mut prompt).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli::build_cli().get_matches();

    let (mut sigint, mut sigterm) = match shutdown::signal_channels() {
        Ok(channels) => channels,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    };

    let result = tokio::select! {
        result = run_app(&matches) => result,
        _ = sigint.recv() => {
            eprintln!();
            eprintln!("Interrupted by user.");
            process::exit(1);
        }
        _ = sigterm.recv() => {
            eprintln!("Terminated.");
            process::exit(1);
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
