use crate::client::Source;
use crate::common::debug;
use crate::{Cursor, Key, Result};

// Walks the keyspace with SCAN.
// Keys created or deleted during the walk may be missed or returned twice.
#[derive(Debug)]
pub struct Enumerator {
    cursor: Cursor,
    batch_size: usize,
    rounds: u64,
    done: bool,
}

impl Enumerator {
    pub fn new(batch_size: usize) -> Self {
        Self {
            cursor: Cursor::START,
            batch_size,
            rounds: 0,
            done: false,
        }
    }

    /// Next batch of keys, or `None` once the server returned cursor 0.
    ///
    /// A failed SCAN round is returned as is, the walk cannot be resumed.
    pub async fn next_batch<S>(&mut self, source: &mut S) -> Result<Option<Vec<Key>>>
    where
        S: Source + Send + ?Sized,
    {
        if self.done {
            return Ok(None);
        }

        let (next, keys) = source.scan(self.cursor, self.batch_size).await?;
        self.rounds += 1;
        debug!(cursor = %self.cursor, next = %next, keys = keys.len(), "Scan");

        self.cursor = next;
        self.done = next.is_complete();

        Ok(Some(keys))
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}
