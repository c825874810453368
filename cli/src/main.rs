//! xorstream
//!
//! Command-line front end: key file + pool width in, stdin to stdout.
//! SIGINT/SIGTERM exit immediately with the signal number as status; no
//! cleanup, partial output may already be on stdout.

mod cli;

use std::io::{self, BufWriter};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use xorstream_core::crypto::Key;
use xorstream_core::stream::{run_pipeline, PipelineConfig};
use xorstream_core::types::{ErrorKind, StreamError};

use crate::cli::Cli;

const EXIT_CONFIG: u8 = 2;
const EXIT_RESOURCE: u8 = 3;
const EXIT_IO: u8 = 4;

fn main() -> ExitCode {
    if let Err(e) = exit_on_termination() {
        eprintln!("xorstream: cannot install signal handler: {e}");
        return ExitCode::from(EXIT_RESOURCE);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("xorstream: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    // ---- Setup (fails before any block is read) ----
    let key = Key::load(&cli.key)
        .with_context(|| format!("loading key file {}", cli.key.display()))?;
    let profile = cli.workers.profile().context("resolving thread count")?;
    let config = PipelineConfig::new(profile);

    info!("[CLI] block_len={}, workers={}", key.len(), profile.workers);

    // ---- Stream ----
    let stdin = io::stdin();
    let stdout = BufWriter::new(io::stdout());

    let snapshot = run_pipeline(stdin, stdout, &key, &config).context("transforming stream")?;

    if cli.stats {
        eprintln!("{}", snapshot.to_json().context("encoding run report")?);
    }

    Ok(())
}

/// Watch SIGINT/SIGTERM on a background thread and exit with the signal
/// number as soon as one arrives.
#[cfg(unix)]
fn exit_on_termination() -> io::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    std::thread::Builder::new()
        .name("xorstream-signals".into())
        .spawn(move || {
            if let Some(sig) = signals.forever().next() {
                info!("[CLI] caught signal {sig}, exiting");
                std::process::exit(sig);
            }
        })?;
    Ok(())
}

#[cfg(not(unix))]
fn exit_on_termination() -> io::Result<()> {
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<StreamError>().map(StreamError::kind) {
        Some(ErrorKind::Config) => EXIT_CONFIG,
        Some(ErrorKind::Resource) => EXIT_RESOURCE,
        Some(ErrorKind::Io) => EXIT_IO,
        None => 1,
    }
}
