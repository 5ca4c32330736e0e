//! Extract the JSON patcher from a binary .amxd file

use amxd_cli::{exit_with, handle_unwrap, init_logging, parse_args};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "unwrap-amxd")]
#[command(about = "Extract JSON patcher data from a binary .amxd file")]
#[command(version)]
struct Cli {
    /// Input file (.amxd)
    input: PathBuf,
    /// Output file (.json); standard output when omitted
    output: Option<PathBuf>,
    /// Escape every non-ASCII character as \uXXXX
    #[arg(long)]
    ascii: bool,
    /// Increase log verbosity
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli: Cli = parse_args();
    init_logging(cli.verbose);
    exit_with(handle_unwrap(cli.input, cli.output, cli.ascii))
}
