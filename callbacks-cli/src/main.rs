//! Callback Registry CLI Application
//!
//! Command-line demo for the callbacks library. With no arguments it prints
//! a greeting, registers two handlers and dispatches them once. On top of
//! that it adds:
//! - TOML configuration of the greeting, handlers and registry limits
//! - Handlers loaded from shared libraries (C FFI)
//! - A mode that drives the registry through its C interface

use anyhow::Result;
use clap::Parser;
use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

mod config;
mod demo;
mod plugin;

/// Callback registry demo - register handlers and dispatch them in order
#[derive(Parser, Debug)]
#[command(name = "callbacks-cli")]
#[command(about = "Register callback handlers and dispatch them in order", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of dispatch rounds (overrides the config file)
    #[arg(short, long, value_name = "COUNT")]
    rounds: Option<u32>,

    /// Go through the C interface (create_callbacks / dispatch_callbacks)
    #[arg(long)]
    ffi: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Callbacks CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using callbacks library v{}", callbacks::VERSION);

    let mut app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            let loaded = config::load_config(path)?;
            log::debug!("Configuration loaded successfully");
            loaded
        }
        None => config::AppConfig::default(),
    };

    if let Some(rounds) = args.rounds {
        app_config.rounds = rounds;
    }

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&app_config)?);
        return Ok(());
    }

    let mode = if args.ffi {
        demo::Mode::Ffi
    } else {
        demo::Mode::Native
    };
    log::debug!("Running in {:?} mode", mode);

    let out: demo::Sink = Rc::new(RefCell::new(io::stdout()));
    demo::run(&app_config, mode, out)?;

    Ok(())
}

/// Initialize logging based on verbosity level
///
/// Logs go to stderr so stdout only carries handler output.
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::{Builder, Target};
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
