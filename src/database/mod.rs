pub mod users;

#[cfg(test)]
pub mod memory;

pub use users::*;

use crate::config::DEFAULT_DATABASE_NAME;
use crate::utils::error::AppError;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.app_name = Some("users-service".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        // Nome do banco vem do path da URI (".../mydatabase")
        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        let mongodb = Self { client, db };

        // Test connection
        mongodb.ping().await?;
        log::info!("✅ Connected to MongoDB database: {}", db_name);

        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Índices auxiliares; falha aqui não impede o startup
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<Document>(USERS_COLLECTION);
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: {}(email)", USERS_COLLECTION),
            Err(e) => log::debug!("   ℹ️  Index not created: {}", e),
        }
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Encerra o pool de conexões. Chamado depois que o servidor HTTP para.
    pub async fn shutdown(self) {
        log::info!("🔌 Closing MongoDB connections...");
        self.client.shutdown().await;
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}
