//! nxstat-feeds — log line sources for nxstat.
//!
//! A [`Feed`] hands out raw line bytes one at a time; [`ingest`] pumps them
//! through a [`Pipeline`](nxstat_core::Pipeline) into an
//! [`Aggregator`](nxstat_core::Aggregator). Only one line, capped at
//! [`MAX_LINE_BYTES`], is resident at a time, so input size is bounded by
//! disk, not memory.

pub mod error;
pub mod file;
pub mod ingest;
pub mod reader;
pub mod stdin;

pub use error::FeedError;
pub use file::{open, FileFeed};
pub use ingest::ingest;
pub use reader::ReaderFeed;
pub use stdin::StdinFeed;

use std::io::{self, BufRead, Read};

/// Path argument that selects standard input instead of a file.
pub const STDIN_PATH: &str = "-";

/// Longest line, terminator included, that a feed hands out whole.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// A source of raw log lines.
pub trait Feed {
    /// Human-readable source name for diagnostics.
    fn name(&self) -> &str;

    /// Read the next line into `buf`, replacing its contents. The line
    /// terminator is kept. Returns `false` at end of input.
    ///
    /// A line longer than [`MAX_LINE_BYTES`] is cut to `MAX_LINE_BYTES + 1`
    /// bytes and the rest of it is discarded; see [`is_oversized`].
    fn next_line(&mut self, buf: &mut Vec<u8>) -> Result<bool, FeedError>;
}

impl<F: Feed + ?Sized> Feed for Box<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn next_line(&mut self, buf: &mut Vec<u8>) -> Result<bool, FeedError> {
        (**self).next_line(buf)
    }
}

/// True if `line` came back from [`Feed::next_line`] cut short.
pub fn is_oversized(line: &[u8]) -> bool {
    line.len() > MAX_LINE_BYTES
}

/// Shared `BufRead` plumbing for the concrete feeds.
pub(crate) fn read_line<R: BufRead>(
    reader: &mut R,
    name: &str,
    buf: &mut Vec<u8>,
) -> Result<bool, FeedError> {
    let read_error = |source| FeedError::Read {
        name: name.to_string(),
        source,
    };
    buf.clear();
    let read = reader
        .by_ref()
        .take(MAX_LINE_BYTES as u64 + 1)
        .read_until(b'\n', buf)
        .map_err(read_error)?;
    if read == 0 {
        return Ok(false);
    }
    if is_oversized(buf) && buf.last() != Some(&b'\n') {
        skip_line(reader).map_err(read_error)?;
    }
    Ok(true)
}

/// Discard input up to and including the next newline.
fn skip_line<R: BufRead>(reader: &mut R) -> io::Result<()> {
    loop {
        let (used, done) = {
            let available = match reader.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            match available.iter().position(|&b| b == b'\n') {
                Some(end) => (end + 1, true),
                None => (available.len(), available.is_empty()),
            }
        };
        reader.consume(used);
        if done {
            return Ok(());
        }
    }
}
