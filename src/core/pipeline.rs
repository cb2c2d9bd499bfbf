use crate::core::{DocumentSink, Record, SourceReader, Table, TransferStats};
use crate::utils::error::{MigrationError, Result};
use mongodb::bson::Document;
use tracing::{debug, info};

/// Maps each record to its document, keeping arrival order.
pub fn transform(table: Table, records: Vec<Record>) -> Result<Vec<Document>> {
    records
        .iter()
        .map(|record| {
            if record.table() != table {
                return Err(MigrationError::processing(format!(
                    "record {} belongs to {}, not {}",
                    record.id(),
                    record.table(),
                    table
                )));
            }
            Ok(record.to_document())
        })
        .collect()
}

/// Copies one table into its collection, `batch_size` documents per insert call.
pub async fn transfer_table<S, K>(
    source: &S,
    sink: &K,
    table: Table,
    batch_size: usize,
) -> Result<TransferStats>
where
    S: SourceReader,
    K: DocumentSink,
{
    let batch_size = batch_size.max(1);
    let collection = table.collection();

    let records = source.extract(table).await?;
    let rows_read = records.len();
    info!("Extracted {} rows from {}", rows_read, table);

    let documents = transform(table, records)?;

    let mut documents_written = 0;
    let mut remaining = documents.into_iter().peekable();
    while remaining.peek().is_some() {
        let batch: Vec<Document> = remaining.by_ref().take(batch_size).collect();
        debug!("Inserting {} documents into {}", batch.len(), collection);
        documents_written += sink.insert(collection, batch).await?;
    }
    info!("Wrote {} documents to {}", documents_written, collection);

    Ok(TransferStats {
        table,
        collection: collection.to_string(),
        rows_read,
        documents_written,
    })
}
