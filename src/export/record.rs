use bytes::{Bytes, BytesMut};
use chrono::Duration;

use crate::client::Source;
use crate::protocol::command;
use crate::{DumperError, Dump, Key};

// One RESTORE command of the output file.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreRecord {
    key: Key,
    ttl_ms: u64,
    dump: Dump,
}

/// Result of exporting a single key.
#[derive(Debug)]
pub enum Outcome {
    Exported(RestoreRecord),
    /// DUMP or PTTL failed for the key. The export goes on without it.
    Skipped { key: Key, cause: DumperError },
}

impl RestoreRecord {
    pub const COMMAND: &'static [u8] = b"RESTORE";

    pub fn new(key: Key, ttl: Duration, dump: Dump) -> Self {
        Self {
            key,
            ttl_ms: ttl_millis(ttl),
            dump,
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    pub fn dump(&self) -> &Dump {
        &self.dump
    }

    // *4\r\n$7\r\nRESTORE\r\n$<len>\r\n<key>\r\n$<len>\r\n<ttl>\r\n$<len>\r\n<dump>\r\n
    pub fn encode(&self, dst: &mut BytesMut) {
        let ttl = self.ttl_ms.to_string();
        command::encode(
            &[Self::COMMAND, &self.key[..], ttl.as_bytes(), &self.dump[..]],
            dst,
        );
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }
}

/// Milliseconds to pass as the RESTORE ttl argument.
///
/// Sub-millisecond remainders are rounded half up. Zero and negative
/// durations (no expiry, key gone) map to 0, which RESTORE reads as no expiry.
pub fn ttl_millis(ttl: Duration) -> u64 {
    if ttl <= Duration::zero() {
        return 0;
    }

    let ms = ttl.num_milliseconds();
    let rem = ttl - Duration::milliseconds(ms);
    let round_up = rem.num_nanoseconds().map_or(false, |ns| ns >= 500_000);

    ms as u64 + u64::from(round_up)
}

/// Fetch the dump and the ttl of `key`, in that order, and build its record.
pub async fn encode_key<S>(source: &mut S, key: Key) -> Outcome
where
    S: Source + Send + ?Sized,
{
    let dump = match source.dump(&key).await {
        Ok(dump) => dump,
        Err(cause) => return Outcome::Skipped { key, cause },
    };

    let ttl = match source.ttl(&key).await {
        Ok(ttl) => ttl,
        Err(cause) => return Outcome::Skipped { key, cause },
    };

    Outcome::Exported(RestoreRecord::new(key, ttl, dump))
}
