use crate::utils::error::Result;
use crate::utils::validation::{
    redact_uri, validate_port, validate_positive_number, validate_required_string, validate_uri,
    Validate,
};
use clap::Parser;

pub const DEFAULT_MONGO_DB: &str = "db_imc";
pub const DEFAULT_BATCH_SIZE: usize = 1000;

const MONGO_SCHEMES: [&str; 2] = ["mongodb", "mongodb+srv"];

/// Every option is read from the flag first, then from the environment
/// variable named next to it.
#[derive(Clone, Parser)]
#[command(name = "imc-migrate")]
#[command(about = "Copies the users and imc tables from PostgreSQL into MongoDB")]
pub struct MigrationConfig {
    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    #[arg(long, env = "DB_PORT")]
    pub db_port: Option<String>,

    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// "true" (any case) requires TLS to PostgreSQL; any other value connects in plain text
    #[arg(long, env = "DB_SSL", default_value = "false")]
    pub db_ssl: String,

    #[arg(long, env = "MONGO_URI", hide_env_values = true)]
    pub mongo_uri: Option<String>,

    #[arg(long, env = "MONGO_DB", default_value = DEFAULT_MONGO_DB)]
    pub mongo_db: String,

    /// Documents per insert call; 1 inserts row by row
    #[arg(long, env = "MIGRATE_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

/// Validated PostgreSQL connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct PostgresSettings {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub ssl: bool,
}

/// Validated MongoDB connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
}

impl MigrationConfig {
    pub fn ssl_enabled(&self) -> bool {
        self.db_ssl.eq_ignore_ascii_case("true")
    }

    pub fn postgres_settings(&self) -> Result<PostgresSettings> {
        let host = validate_required_string("DB_HOST", &self.db_host)?;
        let port = validate_port("DB_PORT", validate_required_string("DB_PORT", &self.db_port)?)?;
        let dbname = validate_required_string("DB_NAME", &self.db_name)?;
        let user = validate_required_string("DB_USER", &self.db_user)?;
        let password = validate_required_string("DB_PASSWORD", &self.db_password)?;

        Ok(PostgresSettings {
            host: host.to_string(),
            port,
            dbname: dbname.to_string(),
            user: user.to_string(),
            password: password.to_string(),
            ssl: self.ssl_enabled(),
        })
    }

    pub fn mongo_settings(&self) -> Result<MongoSettings> {
        let uri = validate_required_string("MONGO_URI", &self.mongo_uri)?;
        validate_uri("MONGO_URI", uri, &MONGO_SCHEMES)?;

        let database = match self.mongo_db.trim() {
            "" => DEFAULT_MONGO_DB,
            name => name,
        };

        Ok(MongoSettings {
            uri: uri.to_string(),
            database: database.to_string(),
        })
    }
}

impl Validate for MigrationConfig {
    fn validate(&self) -> Result<()> {
        self.postgres_settings()?;
        self.mongo_settings()?;
        validate_positive_number("MIGRATE_BATCH_SIZE", self.batch_size, 1)?;
        Ok(())
    }
}

impl std::fmt::Debug for MigrationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationConfig")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &self.db_password.as_ref().map(|_| "***"))
            .field("db_ssl", &self.db_ssl)
            .field("mongo_uri", &self.mongo_uri.as_deref().map(redact_uri))
            .field("mongo_db", &self.mongo_db)
            .field("batch_size", &self.batch_size)
            .field("verbose", &self.verbose)
            .field("log_json", &self.log_json)
            .finish()
    }
}

impl std::fmt::Debug for PostgresSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &"***")
            .field("ssl", &self.ssl)
            .finish()
    }
}

impl std::fmt::Debug for MongoSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoSettings")
            .field("uri", &redact_uri(&self.uri))
            .field("database", &self.database)
            .finish()
    }
}
