//! Shared command handlers for the `amxd`, `unwrap-amxd` and `wrap-amxd` binaries

use amxd_io::{
    execute_unwrap, execute_wrap, inspect, DeviceCode, Inspection, OutputSink, PrettyStyle,
    UnwrapOptions, UnwrapRequest, WrapOptions, WrapRequest, WrapSummary,
};
use clap::{Parser, ValueEnum};
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;

/// Output format for `ls`
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum LsFormat {
    /// Aligned text table
    Table,
    /// JSON document
    Json,
}

/// Parse arguments, exiting with status 1 on usage errors.
///
/// `--help` and `--version` still exit successfully.
pub fn parse_args<P: Parser>() -> P {
    P::try_parse().unwrap_or_else(|err| {
        let code = if err.use_stderr() { 1 } else { 0 };
        let _ = err.print();
        std::process::exit(code);
    })
}

/// Install the stderr log subscriber. Each `-v` raises the level one step from `warn`.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Map a command result to the process exit status
pub fn exit_with(result: Result<(), Box<dyn Error>>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(std::io::stderr().lock(), "Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Extract the patcher JSON from `input` into `output` or standard output
pub fn handle_unwrap(
    input: PathBuf,
    output: Option<PathBuf>,
    ascii: bool,
) -> Result<(), Box<dyn Error>> {
    let request = UnwrapRequest {
        input,
        output: output
            .clone()
            .map(OutputSink::Path)
            .unwrap_or(OutputSink::Stdout),
        options: UnwrapOptions {
            style: if ascii {
                PrettyStyle::AsciiEscaped
            } else {
                PrettyStyle::Utf8
            },
        },
    };

    let mut stderr = std::io::stderr().lock();
    execute_unwrap(request, &mut stderr)?;
    report_unwrap_summary(&mut stderr, output.as_deref())?;
    Ok(())
}

/// Wrap the JSON in `input` into a container at `output`
pub fn handle_wrap(
    input: PathBuf,
    output: PathBuf,
    device: DeviceCode,
) -> Result<(), Box<dyn Error>> {
    let request = WrapRequest {
        input,
        output: output.clone(),
        options: WrapOptions { device },
    };

    let summary = execute_wrap(request)?;
    let mut stderr = std::io::stderr().lock();
    report_wrap_summary(&mut stderr, &summary, &output)?;
    Ok(())
}

/// List the chunks of `input` on standard output
pub fn handle_ls(input: PathBuf, format: LsFormat) -> Result<(), Box<dyn Error>> {
    let inspection = inspect(&input)?;
    let mut stdout = std::io::stdout().lock();
    match format {
        LsFormat::Table => print_ls_table(&mut stdout, &inspection)?,
        LsFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &inspection)?;
            writeln!(&mut stdout)?;
        }
    }
    Ok(())
}

fn report_unwrap_summary(
    out: &mut impl Write,
    output: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    if let Some(path) = output {
        writeln!(out, "Extracted patcher JSON to {}", path.display())?;
    }
    Ok(())
}

fn report_wrap_summary(
    out: &mut impl Write,
    summary: &WrapSummary,
    output: &Path,
) -> Result<(), Box<dyn Error>> {
    writeln!(
        out,
        "Created {} ({} device, {} bytes patcher data)",
        output.display(),
        summary.device,
        summary.patcher_bytes
    )?;
    Ok(())
}

fn print_ls_table(out: &mut impl Write, inspection: &Inspection) -> Result<(), Box<dyn Error>> {
    writeln!(
        out,
        "{:<4} {:>10} {:<8} {:>10}  DETAIL",
        "#", "OFFSET", "TAG", "LENGTH"
    )?;
    for chunk in &inspection.chunks {
        writeln!(
            out,
            "{:<4} {:>10} {:<8} {:>10}  {}",
            chunk.index,
            chunk.offset,
            chunk.tag.to_string(),
            chunk.length,
            chunk.detail.as_deref().unwrap_or("-")
        )?;
    }
    writeln!(
        out,
        "{} chunk(s), {} bytes",
        inspection.chunks.len(),
        inspection.size
    )?;
    if let Some(truncation) = inspection.truncation {
        writeln!(out, "Truncated: {}", truncation)?;
    }
    Ok(())
}
