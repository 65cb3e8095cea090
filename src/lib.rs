//! smilesensor library root.
//! Exposes the CLI parser, the high-level run() function and the modules
//! behind the capture loop.

pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod face;
pub mod hardware;
pub mod http;
pub mod sink;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use utils::path::resolve_path;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(cli, cfg),
        Commands::Run { .. } => cli::commands::run::handle(&cli.command, cfg),
        Commands::Telemetry { .. } => cli::commands::telemetry::handle(&cli.command, cfg),
        Commands::Detect { .. } => cli::commands::detect::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    // a second init (tests) is harmless
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // load the config once; every command gets it by reference
    let mut cfg = Config::load(&cli.config_path())?;

    if let Some(custom_db) = &cli.db {
        cfg.database = resolve_path(custom_db).to_string_lossy().to_string();
    }

    dispatch(&cli, &cfg)
}
