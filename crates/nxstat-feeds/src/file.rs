//! File feed — streams an access-log file from disk.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use crate::{read_line, Feed, FeedError, StdinFeed, STDIN_PATH};

/// Read buffer size; access-log lines are short, files are long.
const READ_BUFFER_BYTES: usize = 256 * 1024;

pub struct FileFeed {
    name: String,
    reader: BufReader<File>,
}

impl FileFeed {
    pub fn open(path: &Path) -> Result<Self, FeedError> {
        let file = File::open(path).map_err(|source| FeedError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "opened log file");
        Ok(Self {
            name: path.display().to_string(),
            reader: BufReader::with_capacity(READ_BUFFER_BYTES, file),
        })
    }
}

impl Feed for FileFeed {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_line(&mut self, buf: &mut Vec<u8>) -> Result<bool, FeedError> {
        read_line(&mut self.reader, &self.name, buf)
    }
}

/// Open `path` as a feed; `-` selects standard input.
pub fn open(path: &Path) -> Result<Box<dyn Feed>, FeedError> {
    if path.as_os_str() == STDIN_PATH {
        return Ok(Box::new(StdinFeed::new()));
    }
    Ok(Box::new(FileFeed::open(path)?))
}
