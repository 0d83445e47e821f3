use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::{debug, info};

use crate::registrant::{
    Registrant, RegistrantFilter, RegistrantStore, RegistrantUpdate, DEFAULT_PHOTO_MIME_TYPE,
};

const REGISTRANT_COLUMNS: &str =
    "id, session_id, display_name, photo_reference, photo_mime_type, relayed, registered_at";

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS registrants (
            id BIGSERIAL PRIMARY KEY,
            session_id BIGINT NOT NULL UNIQUE,
            display_name TEXT,
            photo_reference TEXT,
            photo_mime_type TEXT NOT NULL DEFAULT 'image/jpeg',
            relayed BOOLEAN NOT NULL DEFAULT FALSE,
            registered_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create registrants table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Registrant store backed by the `registrants` Postgres table
#[derive(Debug, Clone)]
pub struct PgRegistrantStore {
    pool: PgPool,
}

impl PgRegistrantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrantStore for PgRegistrantStore {
    async fn find_by_session_id(&self, session_id: i64) -> Result<Option<Registrant>> {
        debug!(session_id, "Looking up registrant");

        sqlx::query_as::<_, Registrant>(&format!(
            "SELECT {REGISTRANT_COLUMNS} FROM registrants WHERE session_id = $1"
        ))
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to read registrant")
    }

    async fn upsert_by_session_id(
        &self,
        session_id: i64,
        update: &RegistrantUpdate,
    ) -> Result<Registrant> {
        debug!(session_id, "Upserting registrant");

        sqlx::query_as::<_, Registrant>(&format!(
            "INSERT INTO registrants (session_id, display_name, photo_reference, photo_mime_type, relayed)
             VALUES ($1, $2::TEXT, $3::TEXT, COALESCE($4::TEXT, '{DEFAULT_PHOTO_MIME_TYPE}'), $5::BOOLEAN)
             ON CONFLICT (session_id) DO UPDATE SET
                display_name = COALESCE($2::TEXT, registrants.display_name),
                photo_reference = COALESCE($3::TEXT, registrants.photo_reference),
                photo_mime_type = COALESCE($4::TEXT, registrants.photo_mime_type),
                relayed = registrants.relayed OR $5::BOOLEAN
             RETURNING {REGISTRANT_COLUMNS}"
        ))
        .bind(session_id)
        .bind(update.display_name.as_deref())
        .bind(update.photo_reference.as_deref())
        .bind(update.photo_mime_type.as_deref())
        .bind(update.mark_relayed)
        .fetch_one(&self.pool)
        .await
        .context("Failed to upsert registrant")
    }

    async fn update_by_id(&self, id: i64, update: &RegistrantUpdate) -> Result<Option<Registrant>> {
        debug!(registrant_id = id, "Updating registrant");

        sqlx::query_as::<_, Registrant>(&format!(
            "UPDATE registrants SET
                display_name = COALESCE($2::TEXT, display_name),
                photo_reference = COALESCE($3::TEXT, photo_reference),
                photo_mime_type = COALESCE($4::TEXT, photo_mime_type),
                relayed = relayed OR $5::BOOLEAN
             WHERE id = $1
             RETURNING {REGISTRANT_COLUMNS}"
        ))
        .bind(id)
        .bind(update.display_name.as_deref())
        .bind(update.photo_reference.as_deref())
        .bind(update.photo_mime_type.as_deref())
        .bind(update.mark_relayed)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update registrant")
    }

    async fn find_many(&self, filter: &RegistrantFilter) -> Result<Vec<Registrant>> {
        debug!(filter = ?filter, "Listing registrants");

        sqlx::query_as::<_, Registrant>(&format!(
            "SELECT {REGISTRANT_COLUMNS} FROM registrants
             WHERE ($1::BOOLEAN IS NULL OR (photo_reference IS NOT NULL) = $1::BOOLEAN)
               AND ($2::BOOLEAN IS NULL OR relayed = $2::BOOLEAN)
             ORDER BY id"
        ))
        .bind(filter.has_photo)
        .bind(filter.relayed)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list registrants")
    }
}
