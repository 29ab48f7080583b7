//! Ingest driver — one streaming pass of a [`Feed`] through a [`Pipeline`].

use nxstat_core::{Aggregator, IngestSummary, LineOutcome, Pipeline};
use tracing::{debug, info, trace};

use crate::{is_oversized, Feed, FeedError};

/// Read `feed` to the end, recording every line into `aggregator`.
///
/// Per-line problems (bad encoding, unrecognised shape, filtered paths,
/// lines cut at [`MAX_LINE_BYTES`](crate::MAX_LINE_BYTES)) are tallied in the returned summary and never abort the pass. Only I/O errors
/// from the feed itself are returned. A progress line is logged every
/// `progress_interval` lines; 0 disables it.
pub fn ingest<F: Feed + ?Sized>(
    feed: &mut F,
    pipeline: &Pipeline,
    aggregator: &mut Aggregator,
    progress_interval: u64,
) -> Result<IngestSummary, FeedError> {
    let mut summary = IngestSummary::default();
    let mut buf = Vec::with_capacity(1024);

    info!(source = feed.name(), "ingesting");
    while feed.next_line(&mut buf)? {
        let number = summary.lines + 1;
        let outcome = if is_oversized(&buf) {
            debug!(line = number, "skipping over-long line");
            LineOutcome::Malformed
        } else {
            match std::str::from_utf8(&buf) {
                Ok(line) => pipeline.process(line, aggregator),
                Err(err) => {
                    debug!(line = number, %err, "skipping undecodable line");
                    LineOutcome::Undecodable
                }
            }
        };
        trace!(line = number, %outcome, "line done");
        summary.observe(outcome);

        if progress_interval > 0 && summary.lines % progress_interval == 0 {
            info!(source = feed.name(), lines = summary.lines, "progress");
        }
    }

    info!(
        source = feed.name(),
        lines = summary.lines,
        recorded = summary.recorded,
        ignored = summary.ignored,
        malformed = summary.malformed,
        undecodable = summary.undecodable,
        "done"
    );
    Ok(summary)
}
