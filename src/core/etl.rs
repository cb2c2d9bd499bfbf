use crate::config::DEFAULT_BATCH_SIZE;
use crate::core::pipeline::transfer_table;
use crate::core::{DocumentSink, MigrationReport, SourceReader, Table};
use crate::utils::error::Result;
use std::future::Future;
use std::io::Write;
use std::time::Instant;
use tracing::info;

pub const COMPLETION_LINE: &str = "🚀 Migración completa";

/// Opens the source, then the sink. When the sink cannot be opened the
/// source is closed before the error is returned, so nothing is read.
pub async fn open_connections<S, K, SF, KF, F>(source: SF, connect_sink: F) -> Result<(S, K)>
where
    S: SourceReader,
    K: DocumentSink,
    SF: Future<Output = Result<S>>,
    KF: Future<Output = Result<K>>,
    F: FnOnce() -> KF,
{
    let source = source.await?;
    match connect_sink().await {
        Ok(sink) => Ok((source, sink)),
        Err(e) => {
            source.close().await;
            Err(e)
        }
    }
}

/// Runs a full-replace migration over one source and one sink connection.
///
/// The engine owns both handles and closes them when [`EtlEngine::run`]
/// finishes, whether the migration succeeded or not. Progress lines go to
/// stdout unless another writer is set.
pub struct EtlEngine<S: SourceReader, K: DocumentSink> {
    source: S,
    sink: K,
    batch_size: usize,
    progress: Box<dyn Write + Send>,
}

impl<S: SourceReader, K: DocumentSink> EtlEngine<S, K> {
    pub fn new(source: S, sink: K) -> Self {
        Self {
            source,
            sink,
            batch_size: DEFAULT_BATCH_SIZE,
            progress: Box::new(std::io::stdout()),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_progress<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.progress = Box::new(writer);
        self
    }

    pub async fn run(self) -> Result<MigrationReport> {
        let Self {
            source,
            sink,
            batch_size,
            mut progress,
        } = self;

        let outcome = migrate(&source, &sink, batch_size, progress.as_mut()).await;

        source.close().await;
        sink.close().await;

        outcome
    }
}

async fn migrate<S, K>(
    source: &S,
    sink: &K,
    batch_size: usize,
    progress: &mut (dyn Write + Send),
) -> Result<MigrationReport>
where
    S: SourceReader,
    K: DocumentSink,
{
    let started = Instant::now();
    info!("Starting migration (batch size {})", batch_size);

    for table in Table::ALL {
        let deleted = sink.clear(table.collection()).await?;
        info!("Cleared {} documents from {}", deleted, table.collection());
    }

    let mut tables = Vec::with_capacity(Table::ALL.len());
    for table in Table::ALL {
        let stats = transfer_table(source, sink, table, batch_size).await?;
        writeln!(progress, "{}", table.progress_line())?;
        tables.push(stats);
    }

    writeln!(progress, "{}", COMPLETION_LINE)?;
    progress.flush()?;

    Ok(MigrationReport {
        tables,
        elapsed: started.elapsed(),
    })
}
