mod cli;
mod client;
mod commands;
mod config;
mod error;
mod monitor;
mod output;
mod source;
mod telemetry;
mod types;

use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::Level;

use cli::{Cli, Commands};
use client::BuildkiteClient;
use config::Config;
use error::Result;
use std::error::Error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");

        // Show error chain if verbose flag was passed
        if std::env::args().any(|arg| arg == "--verbose" || arg == "-v") {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = std::error::Error::source(cause);
            }
        }

        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing(if cli.verbose { Level::DEBUG } else { Level::WARN });
    output::set_format(cli.output_format());

    match cli.command {
        // Commands that don't require config/client
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "bkmon", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run().await?;
        }
        // Commands that require config and client
        command => {
            let config = Config::load()?;
            let client = BuildkiteClient::new(config.api_url())?;

            match command {
                Commands::Pipelines => {
                    commands::pipelines::list(&client, &config).await?;
                }
                Commands::Status(args) => {
                    commands::status::show(&client, &config, args).await?;
                }
                Commands::Watch(args) => {
                    commands::status::watch(&client, &config, args).await?;
                }
                Commands::Completions { .. } | Commands::Init => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}
