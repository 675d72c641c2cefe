//! Batched loading of line-delimited records into a sink.
//!
//! The store's write API is far too slow point-by-point, so records are
//! buffered and written in bulk. Only a missing write target is fatal, and
//! it is checked before anything is read; everything else is contained at
//! the record or batch scope.

use std::io::BufRead;

use tracing::{info, warn};

use crate::io::sink::{PointSink, SinkError};
use crate::models::bar::FlatBar;

/// Records buffered per bulk write.
pub const BATCH_SIZE: usize = 10_000;

/// Stream line-delimited records into `sink`, one bulk write per
/// `batch_size` records plus a final partial batch.
///
/// Returns the number of records actually written. Unparseable lines are
/// logged and skipped; a failed batch is logged and dropped, never retried,
/// and the run continues with the next records.
pub async fn load_records<R: BufRead>(
    input: R,
    sink: &dyn PointSink,
    batch_size: usize,
) -> Result<u64, SinkError> {
    sink.ensure_target().await?;

    let mut buffer: Vec<FlatBar> = Vec::with_capacity(batch_size);
    let mut written = 0u64;

    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "skipping unreadable line");
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<FlatBar>(&line) {
            Ok(record) => buffer.push(record),
            Err(e) => {
                warn!(error = %e, "skipping malformed record");
                continue;
            }
        }
        if buffer.len() >= batch_size {
            written += flush(sink, &mut buffer).await;
        }
    }

    if !buffer.is_empty() {
        written += flush(sink, &mut buffer).await;
    }

    info!(written, "load finished");
    Ok(written)
}

/// One bulk write. A failure drops the batch; at-most-once delivery.
async fn flush(sink: &dyn PointSink, buffer: &mut Vec<FlatBar>) -> u64 {
    let count = buffer.len() as u64;
    let result = sink.write_batch(buffer).await;
    buffer.clear();
    match result {
        Ok(()) => count,
        Err(e) => {
            warn!(error = %e, dropped = count, "batch write failed; dropping batch");
            0
        }
    }
}
