mod commands;
mod config;
mod deployment;
mod document;
mod error;
mod logger;
mod runner;
mod writer;
use crate::commands::Commands;
use crate::error::Error;
use crate::logger::Logger;
use crate::runner::{Runnable, Runner};
use clap::Parser;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Derive a runner from the command and run it
async fn run(command: impl Runnable) -> Result<(), Error> {
    command.runner().run().await
}

#[tokio::main]
async fn main() -> ExitCode {
    Logger::init();
    let cli = Cli::parse();

    // Match all commands here, in one place
    let result = match cli.command {
        Commands::Generate(cmd) => run(cmd).await,
        Commands::Expand(cmd) => run(cmd).await,
    };

    if let Err(error) = result {
        eprintln!("\n{}\n{error}", console::style("Error").red().bold());
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
