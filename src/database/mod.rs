pub mod user_store;

use mongodb::bson::doc;
use mongodb::{options::ClientOptions, Client, Collection, Database};
use std::time::Duration;

pub use user_store::{MongoUserStore, UserStore};

/// Database used when the connection string does not name one
pub const DEFAULT_DATABASE: &str = "api-server";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    /// Builds the pooled client. No round trip is made here; the driver
    /// connects lazily and keeps reconnecting on its own.
    pub async fn new(uri: &str) -> mongodb::error::Result<Self> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        Ok(Self { db })
    }

    /// Round trip to the server, used to report connectivity at startup.
    pub async fn ping(&self) -> mongodb::error::Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_name_from_uri() {
        let db = MongoDB::new("mongodb://localhost:27017/users-test").await.unwrap();
        assert_eq!(db.database().name(), "users-test");
    }

    #[tokio::test]
    async fn test_default_database_name() {
        let db = MongoDB::new("mongodb://localhost:27017").await.unwrap();
        assert_eq!(db.database().name(), DEFAULT_DATABASE);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_ping() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGO_URL")
            .unwrap_or_else(|_| "mongodb://localhost/api-server".to_string());

        let db = MongoDB::new(&uri).await.unwrap();
        assert!(db.ping().await.is_ok());
        assert!(db.database().list_collection_names().await.is_ok());
    }
}
