mod claude;
mod cli_args;
mod commands;
mod options;

use clap::Parser;
use cli_args::{Cli, Commands};
use colored::Colorize;
use log::LevelFilter;
use sandworm_core::AppError;
use std::process;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.quiet, cli.verbose);

    if let Err(err) = run_app(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        process::exit(exit_code(&err));
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let level = if quiet {
        LevelFilter::Off
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn run_app(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        // Bare invocation is a push, matching the most common workflow.
        None => commands::push::handle_push_command(cli.directory.clone(), &cli.shared, cli.quiet),
        Some(Commands::Generate(args)) => {
            commands::generate::handle_generate_command(
                args.directory.clone(),
                &cli.shared,
                cli.quiet,
            )
        }
        Some(Commands::Push(args)) => {
            commands::push::handle_push_command(args.directory.clone(), &cli.shared, cli.quiet)
        }
        Some(Commands::Purge) => commands::purge::handle_purge_command(cli.quiet),
        Some(Commands::Setup) => commands::setup::handle_setup_command(),
        Some(Commands::Config(args)) => commands::config::handle_config_command(&args.action),
    }
}

/// Usage and configuration mistakes exit 1; I/O failures exit 2.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::Config(_) | AppError::IgnoreFile { .. } | AppError::Json(_)) => 1,
        Some(
            AppError::Io(_)
            | AppError::FileRead { .. }
            | AppError::FileWrite { .. }
            | AppError::Walk(_)
            | AppError::Ignore(_),
        ) => 2,
        _ => 1,
    }
}
