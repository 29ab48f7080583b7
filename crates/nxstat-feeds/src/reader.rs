//! Generic feed over any buffered reader (decompressors, in-memory buffers).

use std::io::BufRead;

use crate::{read_line, Feed, FeedError};

pub struct ReaderFeed<R> {
    name: String,
    reader: R,
}

impl<R: BufRead> ReaderFeed<R> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
        }
    }
}

impl<R: BufRead> Feed for ReaderFeed<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_line(&mut self, buf: &mut Vec<u8>) -> Result<bool, FeedError> {
        read_line(&mut self.reader, &self.name, buf)
    }
}
