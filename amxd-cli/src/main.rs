//! AMXD CLI - Command-line tool for .amxd device containers
//!
//! This binary provides:
//! - unwrap: extract the patcher JSON from .amxd → pretty-printed JSON
//! - wrap: embed a JSON patcher into a new .amxd container
//! - ls: list the chunks of a container

use amxd_cli::{
    exit_with, handle_ls, handle_unwrap, handle_wrap, init_logging, parse_args, LsFormat,
};
use amxd_io::DeviceCode;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "amxd")]
#[command(about = "Unwrap, wrap and inspect .amxd device containers")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the patcher JSON from a .amxd file
    ///
    /// Examples:
    ///   amxd unwrap device.amxd
    ///   amxd unwrap device.amxd device.json --ascii
    Unwrap {
        /// Input file (.amxd)
        input: PathBuf,
        /// Output file (.json); standard output when omitted
        output: Option<PathBuf>,
        /// Escape every non-ASCII character as \uXXXX
        #[arg(long)]
        ascii: bool,
    },
    /// Wrap a JSON patcher into a .amxd file
    ///
    /// Examples:
    ///   amxd wrap device.json device.amxd
    ///   amxd wrap device.json device.amxd midi_effect
    Wrap {
        /// Input file (.json)
        input: PathBuf,
        /// Output file (.amxd)
        output: PathBuf,
        /// Device code: four ASCII bytes (aaaa, mmmm, iiii) or
        /// audio_effect, midi_effect, instrument
        #[arg(default_value = "aaaa")]
        device: DeviceCode,
    },
    /// List the chunks of a .amxd file
    Ls {
        /// Input file (.amxd)
        input: PathBuf,
        /// Output format (table, json)
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },
}

fn main() -> ExitCode {
    let cli: Cli = parse_args();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Unwrap {
            input,
            output,
            ascii,
        } => handle_unwrap(input, output, ascii),
        Commands::Wrap {
            input,
            output,
            device,
        } => handle_wrap(input, output, device),
        Commands::Ls { input, format } => handle_ls(input, format),
    };

    exit_with(result)
}
