use crate::config::MongoSettings;
use crate::domain::ports::DocumentSink;
use crate::utils::error::Result;
use crate::utils::validation::redact_uri;
use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection, Database};
use tracing::{debug, info};

/// MongoDB connection holding the target database.
pub struct MongoSink {
    client: Client,
    database: Database,
}

impl MongoSink {
    pub async fn connect(settings: &MongoSettings) -> Result<Self> {
        info!("Connecting to MongoDB at {}", redact_uri(&settings.uri));

        let client = Client::with_uri_str(&settings.uri).await?;
        let database = client.database(&settings.database);

        // Server selection is lazy; force a round trip so bad URIs fail here.
        database.run_command(doc! { "ping": 1 }).await?;
        info!("Connected to MongoDB database: {}", settings.database);

        Ok(Self { client, database })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentSink for MongoSink {
    async fn clear(&self, collection: &str) -> Result<u64> {
        let result = self.collection(collection).delete_many(doc! {}).await?;
        debug!(
            "Deleted {} documents from {}",
            result.deleted_count, collection
        );
        Ok(result.deleted_count)
    }

    async fn insert(&self, collection: &str, mut documents: Vec<Document>) -> Result<u64> {
        let target = self.collection(collection);

        match documents.len() {
            0 => Ok(0),
            1 => {
                target.insert_one(documents.remove(0)).await?;
                Ok(1)
            }
            _ => {
                // Ordered by default: the first duplicate _id stops the batch.
                let result = target.insert_many(documents).await?;
                Ok(result.inserted_ids.len() as u64)
            }
        }
    }

    async fn close(self) {
        self.client.shutdown().await;
        debug!("MongoDB client shut down");
    }
}
