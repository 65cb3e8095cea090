use crate::config::{Config, SinkKind};
use crate::hardware::SimulatedLevel;
use crate::utils::path::expand_tilde;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for smilesensor
/// PIR-triggered camera capture with face attribute reporting
#[derive(Parser)]
#[command(
    name = "smilesensor",
    version = env!("CARGO_PKG_VERSION"),
    about = "Motion-triggered capture: detect faces, estimate age/gender/smile and report them",
    long_about = None
)]
pub struct Cli {
    /// Use another configuration file
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<String>,

    /// Override journal database path (useful for tests or custom DB)
    #[arg(global = true, long = "db", value_name = "FILE")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Verbose diagnostics (same as RUST_LOG=debug)
    #[arg(global = true, long, short = 'v')]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the configuration file and the journal database
    Init,

    /// Manage the configuration file (view, check, edit, import)
    Config {
        /// Print the effective configuration (secrets masked)
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        /// Report missing credentials for the selected sink
        #[arg(long = "check", help = "Check configuration for missing settings")]
        check: bool,

        /// Sink to check (defaults to the configured one)
        #[arg(long, value_enum, requires = "check")]
        sink: Option<SinkKind>,

        /// Edit the configuration file with your preferred editor
        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        /// Specify the editor to use (overrides $EDITOR/$VISUAL)
        #[arg(long = "editor", requires = "edit_config")]
        editor: Option<String>,

        /// Import ms_api_key.yaml / kintone_conf.yaml from a legacy conf directory
        #[arg(long = "migrate", help = "Import legacy conf/*.yaml settings")]
        migrate: bool,

        /// Directory holding the legacy files (default: ./conf)
        #[arg(long = "from", value_name = "DIR", requires = "migrate")]
        from: Option<String>,
    },

    /// Watch the PIR sensor, capture, detect faces and report them
    Run {
        /// Where to send face attributes (defaults to the configured sink)
        #[arg(long, value_enum)]
        sink: Option<SinkKind>,

        /// Seconds between polls (defaults to sensor.poll_interval_secs)
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,

        /// Stop after this many polling cycles
        #[arg(long, value_name = "N")]
        cycles: Option<u64>,

        /// Use a simulated motion sensor stuck at the given level
        #[arg(long, value_enum)]
        simulate: Option<SimulatedLevel>,
    },

    /// Report PIR presence and temperature to the webhook periodically
    Telemetry {
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,

        #[arg(long, value_name = "N")]
        cycles: Option<u64>,

        /// Use simulated PIR and thermometer readings
        #[arg(long, value_enum)]
        simulate: Option<SimulatedLevel>,
    },

    /// Take one picture (or use --image) and print the detected faces
    Detect {
        /// Analyse this file instead of taking a picture
        #[arg(long, value_name = "FILE")]
        image: Option<String>,
    },

    /// Print the internal journal
    Log {
        /// Print rows from the journal
        #[arg(long = "print", help = "Print rows from the journal")]
        print: bool,

        /// Only the most recent N rows
        #[arg(long, value_name = "N", requires = "print")]
        last: Option<usize>,
    },
}

impl Cli {
    /// Config file in use: `--config` or the default location.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(Config::config_file)
    }
}
