use crate::domain::message::{AudioFile, MessageSummary, NewMessage};
use crate::error::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub mod memory;
pub mod postgres;
pub mod records;

pub type DbPool = Pool<Postgres>;

/// Narrow persistence seam for message records.
///
/// The production implementation is [`postgres::PgMessageStore`]; tests
/// substitute [`memory::InMemoryMessageStore`].
#[async_trait::async_trait]
pub trait MessageStore: Send + Sync + std::fmt::Debug {
    /// Administrative connectivity probe used by the health check.
    async fn ping(&self) -> Result<()>;

    /// Persists a message and returns the store-generated identifier.
    async fn insert(&self, message: NewMessage) -> Result<String>;

    /// Returns all messages addressed to `recipient`, ordered by creation time ascending.
    async fn list_for_recipient(&self, recipient: &str) -> Result<Vec<MessageSummary>>;

    /// Returns the audio payload of the message with the given identifier, if any.
    async fn fetch_audio(&self, id: &str) -> Result<Option<AudioFile>>;
}

/// Initializes the database connection pool.
///
/// # Errors
/// Returns `sqlx::Error` if the connection fails.
pub async fn init_pool(database_url: &str) -> std::result::Result<DbPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(20).connect(database_url).await
}

/// Runs pending database migrations.
///
/// # Errors
/// Returns `sqlx::migrate::MigrateError` if a migration fails to apply.
pub async fn run_migrations(pool: &DbPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
