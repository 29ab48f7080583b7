//! Stdin feed — for `zcat request.log.gz | nxstat -`.

use std::io::StdinLock;

use crate::{read_line, Feed, FeedError};

pub struct StdinFeed {
    reader: StdinLock<'static>,
}

impl StdinFeed {
    pub fn new() -> Self {
        Self {
            reader: std::io::stdin().lock(),
        }
    }
}

impl Default for StdinFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl Feed for StdinFeed {
    fn name(&self) -> &str {
        "<stdin>"
    }

    fn next_line(&mut self, buf: &mut Vec<u8>) -> Result<bool, FeedError> {
        read_line(&mut self.reader, "<stdin>", buf)
    }
}
