//! Wrap a JSON patcher into a binary .amxd file

use amxd_cli::{exit_with, handle_wrap, init_logging, parse_args};
use amxd_io::DeviceCode;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "wrap-amxd")]
#[command(about = "Wrap JSON patcher data into a binary .amxd file")]
#[command(version)]
struct Cli {
    /// Input file (.json)
    input: PathBuf,
    /// Output file (.amxd)
    output: PathBuf,
    /// Device code: aaaa (audio effect), mmmm (MIDI effect), iiii (instrument)
    #[arg(default_value = "aaaa")]
    device: DeviceCode,
    /// Increase log verbosity
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli: Cli = parse_args();
    init_logging(cli.verbose);
    exit_with(handle_wrap(cli.input, cli.output, cli.device))
}
