use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Source,
    Sink,
    Data,
}

impl MigrationError {
    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::Tls(_) => ErrorCategory::Configuration,
            Self::Postgres(_) => ErrorCategory::Source,
            Self::Mongo(_) => ErrorCategory::Sink,
            Self::ProcessingError { .. } | Self::IoError(_) => ErrorCategory::Data,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the DB_* and MONGO_* environment variables (or the .env file)"
            }
            ErrorCategory::Source => {
                "Check that PostgreSQL is reachable, the credentials are valid and DB_SSL matches the server"
            }
            ErrorCategory::Sink => {
                "Check MONGO_URI and that the MongoDB user may delete and insert in MONGO_DB"
            }
            ErrorCategory::Data => "Inspect the offending rows in the source tables",
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrationError>;
