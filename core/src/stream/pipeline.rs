// ## 📂 File: `src/stream/pipeline.rs`
// ## Coordinator: parallel batches or sequential fallback

use std::io::{Read, Write};
use std::time::Instant;

use log::{debug, info, warn};

use crate::crypto::{apply_keystream, rotate_key, Key};
use crate::stream::block::Block;
use crate::stream::parallelism::ParallelismProfile;
use crate::stream::worker::{WorkerPool, WorkerStats};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    pub profile: ParallelismProfile,
}

impl PipelineConfig {
    pub fn new(profile: ParallelismProfile) -> Self {
        Self { profile }
    }

    pub fn sequential() -> Self {
        Self::new(ParallelismProfile::sequential())
    }

    pub fn with_workers(workers: usize) -> Result<Self, StreamError> {
        Ok(Self::new(ParallelismProfile::fixed(workers)?))
    }
}

/// Dispatch on pool width: 0 runs sequentially, anything else in parallel.
pub fn run_pipeline<R, W>(
    reader: R,
    writer: W,
    key: &Key,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, StreamError>
where
    R: Read,
    W: Write,
{
    if config.profile.is_sequential() {
        run_sequential_pipeline(reader, writer, key)
    } else {
        run_parallel_pipeline(reader, writer, key, config.profile.workers)
    }
}

// ============================================================
// Parallel pipeline
// ============================================================

/// Batch loop over a fixed pool of `workers` threads.
///
/// Each round submits up to `workers` blocks, waits for exactly that many
/// completions, then drains the (already sorted) result queue to `writer`.
/// Output only happens at batch boundaries, so the stream order is kept
/// whatever order the workers finish in.
pub fn run_parallel_pipeline<R, W>(
    mut reader: R,
    mut writer: W,
    key: &Key,
    workers: usize,
) -> Result<TelemetrySnapshot, StreamError>
where
    R: Read,
    W: Write,
{
    let profile = ParallelismProfile::fixed(workers)?;
    if profile.is_sequential() {
        return Err(StreamError::Config("parallel pipeline needs at least one worker".into()));
    }

    let block_len = key.len();
    let mut counters = TelemetryCounters::default();
    let mut timer = TelemetryTimer::new();
    let mut batch_sizes = Vec::new();

    info!("[PIPELINE] start parallel pipeline: workers={workers}, block_len={block_len}");

    let pool = WorkerPool::start(key.shared(), workers)?;

    let outcome = drive_batches(
        &pool,
        &mut reader,
        &mut writer,
        block_len,
        &mut counters,
        &mut timer,
        &mut batch_sizes,
    );
    let joined = pool.shutdown();

    let worker_stats = match (outcome, joined) {
        (Ok(()), Ok(stats)) => stats,
        (Ok(()), Err(e)) => return Err(e),
        // the worker's own error is the root cause of a failed barrier
        (Err(run_err), Err(worker_err)) => {
            warn!("[PIPELINE] aborted: {run_err}");
            return Err(worker_err);
        }
        (Err(run_err), Ok(_)) => return Err(run_err),
    };

    writer.flush()?;
    timer.finish();

    info!(
        "[PIPELINE] done: {} blocks in {} batches, {} bytes",
        counters.blocks, counters.batches, counters.bytes_out
    );

    Ok(TelemetrySnapshot::from(&counters, &timer, workers, block_len)
        .with_batches(batch_sizes)
        .with_worker_blocks(worker_blocks(&worker_stats)))
}

fn drive_batches<R, W>(
    pool: &WorkerPool,
    reader: &mut R,
    writer: &mut W,
    block_len: usize,
    counters: &mut TelemetryCounters,
    timer: &mut TelemetryTimer,
    batch_sizes: &mut Vec<usize>,
) -> Result<(), StreamError>
where
    R: Read,
    W: Write,
{
    let mut next_index = 0u64;
    let mut next_write = 0u64;
    let mut end_of_input = false;

    while !end_of_input {
        // ---- Submit up to `width` blocks ----
        let read_start = Instant::now();
        let mut submitted = 0usize;
        // a failed read still lets the blocks already in flight finish
        let mut read_err: Option<StreamError> = None;

        while submitted < pool.width() {
            let block = match Block::read_from(reader, next_index, block_len) {
                Ok(Some(block)) => block,
                Ok(None) => {
                    end_of_input = true;
                    break;
                }
                Err(e) => {
                    read_err = Some(e);
                    break;
                }
            };

            let short = block.is_short(block_len);
            let len = block.len();
            if let Err(e) = pool.submit(block) {
                read_err = Some(e);
                break;
            }
            counters.add_block(len, block_len);

            next_index += 1;
            submitted += 1;

            // a short fill means the source hit end of stream
            if short {
                end_of_input = true;
                break;
            }
        }
        timer.add_stage_time(Stage::Read, read_start.elapsed());

        if submitted == 0 {
            return read_err.map_or(Ok(()), Err);
        }

        // ---- Barrier ----
        timer.time(Stage::Transform, || pool.await_completions(submitted))?;

        // ---- Drain in index order ----
        let write_start = Instant::now();
        let blocks = pool.drain()?;
        if blocks.len() != submitted {
            return Err(StreamError::Pipeline(format!(
                "batch drained {} block(s), expected {submitted}",
                blocks.len()
            )));
        }

        for block in blocks {
            if block.index() != next_write {
                return Err(StreamError::Pipeline(format!(
                    "out-of-order block {} (expected {next_write})",
                    block.index()
                )));
            }
            writer.write_all(block.as_slice())?;
            counters.add_written(block.len());
            next_write += 1;
        }
        timer.add_stage_time(Stage::Write, write_start.elapsed());

        counters.add_batch();
        batch_sizes.push(submitted);
        debug!("[PIPELINE] batch {} flushed: {submitted} block(s)", batch_sizes.len());

        if let Some(e) = read_err {
            warn!("[PIPELINE] input failed after batch {}: {e}", batch_sizes.len());
            return Err(e);
        }
    }

    Ok(())
}

fn worker_blocks(stats: &[WorkerStats]) -> Vec<u64> {
    let mut blocks = vec![0u64; stats.len()];
    for s in stats {
        if let Some(slot) = blocks.get_mut(s.id) {
            *slot = s.blocks;
        }
    }
    blocks
}

// ============================================================
// Sequential pipeline
// ============================================================

/// Single-threaded path over one mutable key buffer.
///
/// After each block the live key is rotated left by one bit, so before block
/// `i` it equals `rotate(original, i)`: the same key a pool worker derives.
pub fn run_sequential_pipeline<R, W>(
    mut reader: R,
    mut writer: W,
    key: &Key,
) -> Result<TelemetrySnapshot, StreamError>
where
    R: Read,
    W: Write,
{
    let block_len = key.len();
    let mut live_key = key.as_bytes().to_vec();
    let mut counters = TelemetryCounters::default();
    let mut timer = TelemetryTimer::new();

    info!("[SEQUENTIAL] start: block_len={block_len}");

    let mut block = Block::with_capacity(0, block_len);
    let mut index = 0u64;

    loop {
        let n = timer.time(Stage::Read, || block.refill(&mut reader, index, block_len))?;
        if n == 0 {
            break;
        }
        counters.add_block(n, block_len);

        timer.time(Stage::Transform, || apply_keystream(block.as_mut_slice(), &live_key))?;

        let write_start = Instant::now();
        writer.write_all(block.as_slice())?;
        counters.add_written(n);
        timer.add_stage_time(Stage::Write, write_start.elapsed());

        rotate_key(&mut live_key, 1);
        index += 1;

        if n < block_len {
            break;
        }
    }

    writer.flush()?;
    timer.finish();

    info!("[SEQUENTIAL] done: {} blocks, {} bytes", counters.blocks, counters.bytes_out);
    Ok(TelemetrySnapshot::from(&counters, &timer, 0, block_len))
}
