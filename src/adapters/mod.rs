//! Concrete stores behind the domain ports.

pub mod mongo;
pub mod postgres;
pub mod tls;

pub use mongo::MongoSink;
pub use postgres::PostgresSource;
