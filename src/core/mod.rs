pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{MigrationReport, Record, Table, TransferStats};
pub use crate::domain::ports::{DocumentSink, SourceReader};
pub use crate::utils::error::Result;
