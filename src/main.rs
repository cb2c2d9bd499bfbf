use clap::Parser;
use imc_migrate::utils::{logger, validation::Validate};
use imc_migrate::core::etl::open_connections;
use imc_migrate::{EtlEngine, MigrationConfig, MigrationError, MongoSink, PostgresSource};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let config = MigrationConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting imc-migrate");
    tracing::debug!("Config: {:?}", config);

    if let Err(e) = run(&config).await {
        tracing::error!(
            "Migration failed (Category: {:?}). Recovery suggestion: {}",
            e.category(),
            e.recovery_suggestion()
        );
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(config: &MigrationConfig) -> Result<(), MigrationError> {
    config.validate()?;
    let pg_settings = config.postgres_settings()?;
    let mongo_settings = config.mongo_settings()?;

    let (source, sink) = open_connections(PostgresSource::connect(&pg_settings), || {
        MongoSink::connect(&mongo_settings)
    })
    .await?;

    let report = EtlEngine::new(source, sink)
        .with_batch_size(config.batch_size)
        .run()
        .await?;

    tracing::info!(
        "✅ Migrated {} documents in {:?}",
        report.documents_written(),
        report.elapsed
    );
    if let Ok(json) = serde_json::to_string(&report) {
        tracing::debug!("Migration report: {}", json);
    }

    Ok(())
}
