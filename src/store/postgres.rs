//! pgvector collection backend

use pgvector::Vector;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::CollectionEntry;
use super::SearchHit;
use crate::config::DatabaseConfig;
use crate::errors::ReviewRagError;
use crate::models::DocumentMetadata;
use crate::Result;

/// Collection stored as a pgvector table named after the collection
#[derive(Debug, Clone)]
pub struct PostgresCollection {
    pool: PgPool,
    name: String,
}

impl PostgresCollection {
    /// Connect without checking that the table exists
    pub async fn connect(config: &DatabaseConfig, name: &str) -> Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;
        Self::with_pool(pool, name)
    }

    /// Wrap an existing pool
    pub fn with_pool(pool: PgPool, name: &str) -> Result<Self> {
        // The name is interpolated into SQL
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ReviewRagError::ConfigError(format!(
                "Invalid collection name '{name}'"
            )));
        }
        Ok(Self {
            pool,
            name: name.to_string(),
        })
    }

    /// Connect and require a table with at least one row
    pub async fn open(config: &DatabaseConfig, name: &str) -> Result<Self> {
        let collection = Self::connect(config, name).await?;
        if !collection.table_exists().await? || collection.count().await? == 0 {
            return Err(ReviewRagError::CollectionNotFound(name.to_string()));
        }
        Ok(collection)
    }

    async fn table_exists(&self) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
            .bind(format!("\"{}\"", self.name))
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn ensure_table(&self) -> Result<()> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await?;
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{}" (
                id UUID PRIMARY KEY,
                content TEXT NOT NULL,
                metadata JSONB NOT NULL,
                embedding vector NOT NULL
            )
            "#,
            self.name
        ))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert all entries in a single transaction
    pub async fn add_entries(&self, entries: Vec<CollectionEntry>) -> Result<()> {
        self.ensure_table().await?;
        let added = entries.len();
        let insert = format!(
            r#"INSERT INTO "{}" (id, content, metadata, embedding) VALUES ($1, $2, $3, $4)"#,
            self.name
        );

        let mut tx = self.pool.begin().await?;
        for entry in entries {
            sqlx::query(&insert)
                .bind(entry.id)
                .bind(entry.content)
                .bind(Json(entry.metadata))
                .bind(Vector::from(entry.embedding))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        info!("Added {} entries to table '{}'", added, self.name);
        Ok(())
    }

    pub async fn search(&self, embedding: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        let query_embedding = Vector::from(embedding.to_vec());
        let limit = i64::try_from(k).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, (Uuid, String, Json<DocumentMetadata>, f64)>(&format!(
            r#"
            SELECT
                id,
                content,
                metadata,
                1 - (embedding <=> $1::vector) AS similarity
            FROM "{}"
            ORDER BY embedding <=> $1::vector
            LIMIT $2
            "#,
            self.name
        ))
        .bind(&query_embedding)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, content, metadata, similarity)| SearchHit {
                id,
                content,
                metadata: metadata.0,
                similarity: similarity as f32,
            })
            .collect())
    }

    pub async fn count(&self) -> Result<usize> {
        if !self.table_exists().await? {
            return Ok(0);
        }
        let count: i64 = sqlx::query_scalar(&format!(r#"SELECT COUNT(*) FROM "{}""#, self.name))
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    pub async fn clear(&self) -> Result<()> {
        self.ensure_table().await?;
        sqlx::query(&format!(r#"TRUNCATE "{}""#, self.name))
            .execute(&self.pool)
            .await?;
        info!("Cleared table '{}'", self.name);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
