use std::path::PathBuf;

use clap::Parser;
use xorstream_core::constants::MAX_WORKERS;
use xorstream_core::stream::ParallelismProfile;

#[derive(Parser, Debug)]
#[command(name = "xorstream")]
#[command(
    about = "Rotating-XOR block transform from stdin to stdout",
    long_about = "Streams stdin to stdout, XOR-ing each key-sized block against the key \
                  rotated left by the block's index (in bits). Running the output back \
                  through with the same key restores the input."
)]
pub struct Cli {
    /// Key file; its byte length is the block size
    #[arg(short = 'k', long = "key", value_name = "KEYFILE")]
    pub key: PathBuf,

    /// Worker threads: 0 = sequential, N = pool of N, `auto` = one per CPU
    #[arg(
        short = 'n',
        long = "threads",
        value_name = "THREADCOUNT",
        default_value = "0",
        value_parser = parse_workers
    )]
    pub workers: WorkerCount,

    /// Print the run report as JSON on stderr
    #[arg(long)]
    pub stats: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerCount {
    Fixed(usize),
    Auto,
}

impl WorkerCount {
    pub fn profile(self) -> Result<ParallelismProfile, xorstream_core::types::StreamError> {
        match self {
            WorkerCount::Fixed(n) => ParallelismProfile::fixed(n),
            WorkerCount::Auto => Ok(ParallelismProfile::available()),
        }
    }
}

pub fn parse_workers(s: &str) -> Result<WorkerCount, String> {
    if s.eq_ignore_ascii_case("auto") {
        return Ok(WorkerCount::Auto);
    }
    let n: usize = s
        .parse()
        .map_err(|_| format!("`{s}` is not a thread count (expected a number or `auto`)"))?;
    if n > MAX_WORKERS {
        return Err(format!("thread count {n} exceeds the maximum of {MAX_WORKERS}"));
    }
    Ok(WorkerCount::Fixed(n))
}
