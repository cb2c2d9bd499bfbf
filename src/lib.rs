pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{MongoSink, PostgresSource};
pub use config::MigrationConfig;
pub use crate::core::{etl::EtlEngine, pipeline::transfer_table};
pub use domain::model::{ImcRow, MigrationReport, Record, Table, TransferStats, UserRow};
pub use domain::ports::{DocumentSink, SourceReader};
pub use utils::error::{MigrationError, Result};
