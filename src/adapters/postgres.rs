use crate::adapters::tls::make_tls_connector;
use crate::config::PostgresSettings;
use crate::domain::model::{ImcRow, Record, Table, UserRow};
use crate::domain::ports::SourceReader;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;
use tokio::task::JoinHandle;
use tokio_postgres::config::SslMode;
use tokio_postgres::{Client, Config, NoTls, Row};
use tracing::{debug, error, info, warn};

/// A single PostgreSQL connection used to read the source tables.
pub struct PostgresSource {
    client: Client,
    connection: JoinHandle<()>,
}

impl PostgresSource {
    pub async fn connect(settings: &PostgresSettings) -> Result<Self> {
        info!(
            "Connecting to PostgreSQL at {}:{}/{} (tls: {})",
            settings.host, settings.port, settings.dbname, settings.ssl
        );

        let config = connection_config(settings);
        let (client, connection) = if settings.ssl {
            let (client, connection) = config.connect(make_tls_connector()?).await?;
            (client, spawn_connection(connection))
        } else {
            let (client, connection) = config.connect(NoTls).await?;
            (client, spawn_connection(connection))
        };

        info!("Connected to PostgreSQL database: {}", settings.dbname);
        Ok(Self { client, connection })
    }
}

fn spawn_connection<F>(connection: F) -> JoinHandle<()>
where
    F: Future<Output = std::result::Result<(), tokio_postgres::Error>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!("PostgreSQL connection error: {}", e);
        }
    })
}

pub fn connection_config(settings: &PostgresSettings) -> Config {
    let mut config = Config::new();
    config
        .host(&settings.host)
        .port(settings.port)
        .dbname(&settings.dbname)
        .user(&settings.user)
        .password(&settings.password)
        .application_name("imc-migrate")
        .ssl_mode(if settings.ssl {
            SslMode::Require
        } else {
            SslMode::Disable
        });
    config
}

/// Full-table projection of `table`, ordered by primary key.
pub fn select_query(table: Table) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY id",
        table.columns().join(", "),
        table.source_name()
    )
}

fn decode_row(table: Table, row: &Row) -> Result<Record> {
    let record = match table {
        Table::Users => Record::User(UserRow {
            id: row.try_get(0)?,
            email: row.try_get(1)?,
            password: row.try_get(2)?,
        }),
        Table::Imc => Record::Imc(ImcRow {
            id: row.try_get(0)?,
            peso: row.try_get(1)?,
            altura: row.try_get(2)?,
            imc: row.try_get(3)?,
            categoria: row.try_get(4)?,
            fecha: row.try_get(5)?,
            user_id: row.try_get(6)?,
        }),
    };
    Ok(record)
}

#[async_trait]
impl SourceReader for PostgresSource {
    async fn extract(&self, table: Table) -> Result<Vec<Record>> {
        let query = select_query(table);
        debug!("Executing: {}", query);

        let rows = self.client.query(query.as_str(), &[]).await?;
        debug!("Fetched {} rows from {}", rows.len(), table);

        rows.iter().map(|row| decode_row(table, row)).collect()
    }

    async fn close(self) {
        // The connection task resolves once its last client is gone.
        drop(self.client);
        if let Err(e) = self.connection.await {
            warn!("PostgreSQL connection task did not shut down cleanly: {}", e);
        }
        debug!("PostgreSQL connection closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_postgres::config::Host;

    fn settings(ssl: bool) -> PostgresSettings {
        PostgresSettings {
            host: "db.internal".to_string(),
            port: 6543,
            dbname: "imc".to_string(),
            user: "app".to_string(),
            password: "s3cret".to_string(),
            ssl,
        }
    }

    #[test]
    fn test_select_queries() {
        assert_eq!(
            select_query(Table::Users),
            "SELECT id, email, password FROM users ORDER BY id"
        );
        assert_eq!(
            select_query(Table::Imc),
            "SELECT id, peso, altura, imc, categoria, fecha, user_id FROM imc ORDER BY id"
        );
    }

    #[test]
    fn test_connection_config() {
        let config = connection_config(&settings(false));
        assert_eq!(config.get_hosts(), &[Host::Tcp("db.internal".to_string())]);
        assert_eq!(config.get_ports(), &[6543]);
        assert_eq!(config.get_dbname(), Some("imc"));
        assert_eq!(config.get_user(), Some("app"));
        assert_eq!(config.get_password(), Some("s3cret".as_bytes()));
        assert!(matches!(config.get_ssl_mode(), SslMode::Disable));
    }

    #[test]
    fn test_ssl_requires_tls() {
        let config = connection_config(&settings(true));
        assert!(matches!(config.get_ssl_mode(), SslMode::Require));
    }
}
