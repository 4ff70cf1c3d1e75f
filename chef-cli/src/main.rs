//! Command-line interface for chef
//! Brews the versioned Caramel grammar into the generated grammar consumed by ANTLR.
//!
//! Usage:
//!   chef brew [`<source>`] [--output `<path>`] [--force] [--stdout]   - Brew the grammar
//!   chef macros [`<source>`] [--format `<format>`]                   - List the macro table
mod commands;

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io::IsTerminal;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];
const DEFAULT_LEVEL: usize = 3;

fn cli() -> Command {
    let source_arg = Arg::new("source")
        .help("Grammar source to brew (default: newest versioned file in the grammar directory)")
        .index(1);

    Command::new("chef")
        .version(env!("CARGO_PKG_VERSION"))
        .about("The Caramel jack of all trades")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults (default: ./chef.toml if present)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .conflicts_with("quiet")
                .help("Increase the verbosity (repeat for even more verbosity)"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .global(true)
                .action(ArgAction::Count)
                .help("Decrease the verbosity (repeat for less verbosity)"),
        )
        .subcommand(
            Command::new("brew")
                .about("Brew the grammar file")
                .arg(source_arg.clone())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Where to write the brewed grammar"),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .short('f')
                        .action(ArgAction::SetTrue)
                        .help("Brew even if the brewed grammar is up-to-date"),
                )
                .arg(
                    Arg::new("stdout")
                        .long("stdout")
                        .action(ArgAction::SetTrue)
                        .help("Print the brewed grammar instead of writing it"),
                )
                .arg(
                    Arg::new("matching")
                        .long("matching")
                        .short('m')
                        .value_parser(["word-boundary", "substring"])
                        .help("How macro names are matched in the grammar rules"),
                ),
        )
        .subcommand(
            Command::new("macros")
                .about("List the macro table of a grammar source")
                .arg(source_arg)
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('F')
                        .value_parser(commands::AVAILABLE_FORMATS.to_vec())
                        .default_value("text")
                        .help("Output format"),
                ),
        )
}

fn init_logging(matches: &ArgMatches) {
    let verbose = matches.get_count("verbose") as usize;
    let quiet = matches.get_count("quiet") as usize;
    let level = (DEFAULT_LEVEL + verbose)
        .saturating_sub(quiet)
        .min(LEVELS.len() - 1);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(LEVELS[level]));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let matches = cli().get_matches();
    init_logging(&matches);
    let start_time = Instant::now();

    let result = match matches.subcommand() {
        Some(("brew", brew_matches)) => commands::handle_brew_command(brew_matches),
        Some(("macros", macros_matches)) => commands::handle_macros_command(macros_matches),
        _ => unreachable!(),
    };

    match result {
        Ok(()) => tracing::info!("Completed in {:.3?}.", start_time.elapsed()),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}
