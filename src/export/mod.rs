mod enumerator;
pub use enumerator::Enumerator;

mod record;
pub use record::{encode_key, ttl_millis, Outcome, RestoreRecord};

mod writer;
pub use writer::OutputWriter;

use std::fmt;

use tokio::fs;
use tokio::io::AsyncWrite;

use crate::client::tcp::Client;
use crate::client::Source;
use crate::common::{debug, error, info, trace};
use crate::{Config, Result};

/// Counters of a finished export.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub batches: u64,
    pub exported: u64,
    pub skipped: u64,
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} keys exported, {} skipped in {} batches",
            self.exported, self.skipped, self.batches
        )
    }
}

// Drives scan -> encode each key -> flush until the scan completes.
pub struct Exporter<S, W = fs::File> {
    source: S,
    writer: OutputWriter<W>,
    batch_size: usize,
}

impl<S, W> Exporter<S, W>
where
    S: Source + Send,
    W: AsyncWrite + Unpin,
{
    pub fn new(source: S, writer: OutputWriter<W>, batch_size: usize) -> Self {
        Self {
            source,
            writer,
            batch_size,
        }
    }

    /// Export every key the scan yields.
    ///
    /// Keys whose DUMP or PTTL fails are logged and skipped. A failed SCAN or a failed
    /// write aborts the run; records of completed batches are already flushed.
    pub async fn run(&mut self) -> Result<ExportSummary> {
        let mut enumerator = Enumerator::new(self.batch_size);
        let mut summary = ExportSummary::default();

        while let Some(keys) = enumerator.next_batch(&mut self.source).await? {
            summary.batches += 1;

            for key in keys {
                match encode_key(&mut self.source, key).await {
                    Outcome::Exported(record) => {
                        trace!(key = %record.key(), ttl_ms = record.ttl_ms(), "Export");
                        self.writer.write_record(&record).await?;
                        summary.exported += 1;
                    }
                    Outcome::Skipped { key, cause } => {
                        error!(key = %key, "couldn't dump key {}: {}", key, cause);
                        summary.skipped += 1;
                    }
                }
            }

            self.writer.flush().await?;
            debug!(batch = summary.batches, cursor = %enumerator.cursor(), "Batch flushed");
        }

        Ok(summary)
    }

    pub fn writer(&self) -> &OutputWriter<W> {
        &self.writer
    }

    pub fn into_parts(self) -> (S, OutputWriter<W>) {
        (self.source, self.writer)
    }
}

/// Export the database described by `config` into `config.output_path()`.
pub async fn export(config: &Config) -> Result<ExportSummary> {
    let client = Client::connect(config.address(), config.db()).await?;
    info!(address = config.address(), db = config.db(), "Connected");

    let path = config.output_path();
    let writer = OutputWriter::create(&path).await?;

    let mut exporter = Exporter::new(client, writer, config.batch_size());
    let summary = exporter.run().await?;

    let (_, writer) = exporter.into_parts();
    info!(path = %path.display(), bytes = writer.bytes(), "{}", summary);
    writer.finish().await?;

    Ok(summary)
}
