use super::traits::{AggregateStore, StoreFuture};
use super::types::{RatingAggregate, RatingEvent, StoredRating};
use crate::catalog::Catalog;
use crate::error::StoreError;
use crate::feedback::Rating;
use crate::selection::Selection;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use std::path::Path;

/// Two-table SQLite backend: `items` holds the aggregates, `ratings` the
/// audit trail.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }

        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&url)
            .await
            .with_context(|| format!("Failed to open ratings DB: {}", db_path.display()))?;

        ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    async fn seed_impl(&self, catalog: &Catalog) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin seed")?;
        for category in catalog.categories() {
            for tag in &category.tags {
                sqlx::query(
                    "INSERT OR IGNORE INTO items (category, name, total_score, rating_count)
                     VALUES (?, ?, 0, 0)",
                )
                .bind(&category.name)
                .bind(&tag.name)
                .execute(&mut *tx)
                .await
                .context("Failed to seed catalog item")?;
            }
        }
        tx.commit().await.context("Failed to commit seed")?;
        Ok(())
    }

    async fn aggregates_impl(&self, category: &str) -> Result<Vec<RatingAggregate>> {
        let rows = sqlx::query(
            "SELECT category, name, total_score, rating_count
             FROM items WHERE category = ? ORDER BY name ASC",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| RatingAggregate {
                category: row.get("category"),
                tag: row.get("name"),
                total_score: row.get("total_score"),
                rating_count: row.get("rating_count"),
            })
            .collect())
    }

    async fn record_event_impl(&self, event: &RatingEvent) -> Result<()> {
        let snapshot =
            serde_json::to_string(&event.selections).context("Failed to serialize selection")?;
        let rating = event.rating.value();

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin rating transaction")?;

        sqlx::query("INSERT INTO ratings (rating, selections, created_at) VALUES (?, ?, ?)")
            .bind(rating)
            .bind(&snapshot)
            .bind(event.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .context("Failed to insert rating")?;

        for (category, tag) in event.selections.pairs() {
            sqlx::query(
                "INSERT INTO items (category, name, total_score, rating_count)
                 VALUES (?, ?, ?, 1)
                 ON CONFLICT(category, name) DO UPDATE SET
                    total_score = total_score + excluded.total_score,
                    rating_count = rating_count + 1",
            )
            .bind(category)
            .bind(tag)
            .bind(rating)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to update aggregate {category}/{tag}"))?;
        }

        tx.commit()
            .await
            .context("Failed to commit rating transaction")?;
        Ok(())
    }

    async fn recent_events_impl(&self, limit: usize) -> Result<Vec<StoredRating>> {
        let rows = sqlx::query(
            "SELECT id, rating, selections, created_at
             FROM ratings ORDER BY id DESC LIMIT ?",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            events.push(row_to_stored_rating(&row)?);
        }
        Ok(events)
    }
}

impl AggregateStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn seed<'a>(&'a self, catalog: &'a Catalog) -> StoreFuture<'a, ()> {
        Box::pin(self.seed_impl(catalog))
    }

    fn aggregates<'a>(&'a self, category: &'a str) -> StoreFuture<'a, Vec<RatingAggregate>> {
        Box::pin(self.aggregates_impl(category))
    }

    fn record_event<'a>(&'a self, event: &'a RatingEvent) -> StoreFuture<'a, ()> {
        Box::pin(self.record_event_impl(event))
    }

    fn recent_events(&self, limit: usize) -> StoreFuture<'_, Vec<StoredRating>> {
        Box::pin(self.recent_events_impl(limit))
    }
}

// ── Schema ──────────────────────────────────────────────────────────────────

async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS items (
            category     TEXT NOT NULL,
            name         TEXT NOT NULL,
            total_score  INTEGER NOT NULL DEFAULT 0,
            rating_count INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (category, name)
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| StoreError::Schema(e.to_string()))
    .context("Failed to create items table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS ratings (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            rating     INTEGER NOT NULL,
            selections TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| StoreError::Schema(e.to_string()))
    .context("Failed to create ratings table")?;

    Ok(())
}

fn row_to_stored_rating(row: &sqlx::sqlite::SqliteRow) -> Result<StoredRating> {
    let id: i64 = row.get("id");
    let rating_raw: i64 = row.get("rating");
    let selections_raw: String = row.get("selections");
    let created_at_raw: String = row.get("created_at");

    let rating = Rating::try_from(rating_raw)
        .with_context(|| format!("rating row {id} holds an invalid score"))?;
    let selections: Selection = serde_json::from_str(&selections_raw)
        .with_context(|| format!("rating row {id} holds an invalid selection"))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
        .with_context(|| format!("rating row {id} holds an invalid timestamp"))?
        .with_timezone(&Utc);

    Ok(StoredRating {
        id,
        event: RatingEvent {
            rating,
            selections,
            created_at,
        },
    })
}
