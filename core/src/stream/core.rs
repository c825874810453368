// ## 2️⃣ `core.rs` — stable public API

use crate::{
    crypto::Key,
    stream::{
        io::{open_input, open_output, InputSource, OutputSink},
        pipeline::{run_pipeline, PipelineConfig},
    },
    telemetry::TelemetrySnapshot,
    types::StreamError,
};

/// 🔁 Transform a stream with the rotating-XOR block cipher.
///
/// The same call encrypts and decrypts: feeding the output back in with the
/// same key (any pool width) restores the input.
pub fn transform_stream(
    input: InputSource,
    output: OutputSink,
    key: &Key,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    let reader = open_input(input)?;
    let (writer, maybe_buf) = open_output(output)?;

    let mut snapshot = run_pipeline(reader, writer, key, config)?;

    if let Some(buf) = maybe_buf {
        let data = buf
            .lock()
            .map_err(|_| StreamError::Resource("capture buffer poisoned".into()))?;
        snapshot.attach_output(data.clone());
    }

    Ok(snapshot)
}

/// In-memory convenience over `transform_stream`.
pub fn transform_bytes(data: &[u8], key: &Key, workers: usize) -> Result<Vec<u8>, StreamError> {
    let config = PipelineConfig::with_workers(workers)?;
    let mut out = Vec::with_capacity(data.len());
    run_pipeline(data, &mut out, key, &config)?;
    Ok(out)
}
