use std::path::Path;

use bytes::BytesMut;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::common::debug;
use crate::export::RestoreRecord;
use crate::{DumperError, Result};

// Buffered sink for encoded records.
// Records are appended only. flush is left to the caller.
pub struct OutputWriter<W = fs::File> {
    stream: BufWriter<W>,
    buffer: BytesMut,
    records: u64,
    bytes: u64,
}

impl OutputWriter<fs::File> {
    /// Create (or truncate) the file at `path`.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .await
            .map_err(|source| DumperError::CreateOutput {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), "Output created");

        Ok(OutputWriter::new(f))
    }
}

impl<W> OutputWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(inner: W) -> Self {
        Self {
            stream: BufWriter::with_capacity(64 * 1024, inner),
            buffer: BytesMut::with_capacity(4 * 1024),
            records: 0,
            bytes: 0,
        }
    }

    pub async fn write_record(&mut self, record: &RestoreRecord) -> Result<()> {
        self.buffer.clear();
        record.encode(&mut self.buffer);

        self.stream.write_all(&self.buffer).await?;
        self.records += 1;
        self.bytes += self.buffer.len() as u64;
        Ok(())
    }

    pub async fn flush(&mut self) -> Result<()> {
        self.stream.flush().await?;
        Ok(())
    }

    /// Flush buffered records and return the underlying writer.
    pub async fn finish(mut self) -> Result<W> {
        self.stream.flush().await?;
        self.stream.shutdown().await?;
        Ok(self.stream.into_inner())
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn get_ref(&self) -> &W {
        self.stream.get_ref()
    }
}
