use crate::models::{Event, Game, Location};
use mongodb::{
    bson::doc, options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    /// Builds the client. The driver connects lazily, so an unreachable server
    /// only shows up on the first operation or [`MongoDb::health_check`].
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for gamenight-service");

        let bgg_id_index = IndexModel::builder()
            .keys(doc! { "bgg_id": 1 })
            .options(IndexOptions::builder().name("bgg_id_lookup".to_string()).build())
            .build();
        self.games().create_index(bgg_id_index, None).await.map_err(|e| {
            tracing::error!("Failed to create bgg_id index on games collection: {}", e);
            AppError::from(e)
        })?;

        let position_index = IndexModel::builder()
            .keys(doc! { "latitude": 1, "longitude": 1 })
            .options(IndexOptions::builder().name("position_lookup".to_string()).build())
            .build();
        self.locations()
            .create_index(position_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create position index on locations collection: {}", e);
                AppError::from(e)
            })?;

        let start_time_index = IndexModel::builder()
            .keys(doc! { "start_time": 1 })
            .options(IndexOptions::builder().name("start_time_lookup".to_string()).build())
            .build();
        self.events()
            .create_index(start_time_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create start_time index on events collection: {}", e);
                AppError::from(e)
            })?;

        tracing::info!("MongoDB indexes ready");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn games(&self) -> Collection<Game> {
        self.db.collection("games")
    }

    pub fn locations(&self) -> Collection<Location> {
        self.db.collection("locations")
    }

    pub fn events(&self) -> Collection<Event> {
        self.db.collection("events")
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
