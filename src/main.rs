mod cli;
mod commands;
mod config;
mod engine;
mod error;
mod paths;
mod progress;
mod runner;
mod shellenv;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command, UpArgs};
use error::ProvisionError;
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() {
    let code = match run() {
        Ok(()) => 0,
        Err(err) => {
            ui::error(&format!("{err:#}"));
            // Propagate the failing external tool's exit code when we have one
            err.downcast_ref::<ProvisionError>()
                .map_or(1, ProvisionError::exit_code)
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        // Zero-argument invocation runs the full plan
        None => commands::up::run(&ctx, UpArgs::default()),
        Some(Command::Up(args)) => commands::up::run(&ctx, args),
        Some(Command::Plan(args)) => commands::plan::run(&ctx, args),
        Some(Command::Env(args)) => commands::env::run(&ctx, args),
        Some(Command::Doctor) => commands::doctor::run(&ctx),
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "roadie", &mut io::stdout());
            Ok(())
        }
    }
}
