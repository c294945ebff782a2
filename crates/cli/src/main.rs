mod cli;
mod commands;
mod parse;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::commands::{eval_command, invert_command, list_command};

fn main() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Cli::parse();
    match args.cmd {
        Commands::Eval {
            expression,
            context,
            rates,
        } => {
            eval_command(&expression, context, &rates)?;
        }
        Commands::Invert {
            expression,
            value,
            context,
            rates,
        } => {
            invert_command(&expression, &value, context, &rates)?;
        }
        Commands::List => {
            list_command()?;
        }
    }
    Ok(())
}
