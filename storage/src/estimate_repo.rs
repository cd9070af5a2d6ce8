//! Estimate repository: persistence and queries for accepted estimates.
//!
//! Uses SqlitePoolManager and the models (EstimateRecord, EstimateStats).
//! External: SQLite via sqlx; callers use save/get_by_id/list_recent/get_stats etc.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::models::{EstimateRecord, EstimateStats};
use crate::repository::Repository;
use crate::sqlite_pool::SqlitePoolManager;

const COMPLETED: &str = "completed";

fn parse_timestamp(value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| StorageError::InvalidData(format!("timestamp '{}': {}", s, e)))
        })
        .transpose()
}

#[derive(Clone)]
pub struct EstimateRepository {
    pool_manager: SqlitePoolManager,
}

impl EstimateRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<()> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS estimates (
                id TEXT PRIMARY KEY,
                order_number TEXT NOT NULL UNIQUE,
                chat_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                event_type TEXT NOT NULL,
                guests INTEGER NOT NULL,
                event_date TEXT,
                menu_cost INTEGER NOT NULL,
                service_cost INTEGER NOT NULL,
                total_cost INTEGER NOT NULL,
                status TEXT NOT NULL,
                details_json TEXT NOT NULL,
                proposal_json TEXT NOT NULL,
                quote_file TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_estimates_chat_id ON estimates(chat_id);
            CREATE INDEX IF NOT EXISTS idx_estimates_status ON estimates(status);
            CREATE INDEX IF NOT EXISTS idx_estimates_created_at ON estimates(created_at);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Inserts a new estimate. Fails with `AlreadyExists` for a duplicate id or order number.
    pub async fn save(&self, estimate: &EstimateRecord) -> Result<()> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query(
            r#"
            INSERT INTO estimates (id, order_number, chat_id, user_id, event_type, guests, event_date,
                menu_cost, service_cost, total_cost, status, details_json, proposal_json, quote_file,
                created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&estimate.id)
        .bind(&estimate.order_number)
        .bind(estimate.chat_id)
        .bind(estimate.user_id)
        .bind(&estimate.event_type)
        .bind(estimate.guests)
        .bind(&estimate.event_date)
        .bind(estimate.menu_cost)
        .bind(estimate.service_cost)
        .bind(estimate.total_cost)
        .bind(&estimate.status)
        .bind(&estimate.details_json)
        .bind(&estimate.proposal_json)
        .bind(&estimate.quote_file)
        .bind(estimate.created_at)
        .bind(estimate.updated_at)
        .execute(pool)
        .await;

        match result {
            Ok(_) => {
                info!(
                    id = %estimate.id,
                    order_number = %estimate.order_number,
                    chat_id = estimate.chat_id,
                    total_cost = estimate.total_cost,
                    "Saved estimate"
                );
                Ok(())
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(
                StorageError::AlreadyExists(format!("estimate {}", estimate.order_number)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<EstimateRecord>> {
        let estimate = sqlx::query_as::<_, EstimateRecord>("SELECT * FROM estimates WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(estimate)
    }

    pub async fn get_by_order_number(&self, order_number: &str) -> Result<Option<EstimateRecord>> {
        let estimate =
            sqlx::query_as::<_, EstimateRecord>("SELECT * FROM estimates WHERE order_number = ?")
                .bind(order_number)
                .fetch_optional(self.pool_manager.pool())
                .await?;
        Ok(estimate)
    }

    /// Newest first.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<EstimateRecord>> {
        let estimates = sqlx::query_as::<_, EstimateRecord>(
            "SELECT * FROM estimates ORDER BY created_at DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;

        debug!(count = estimates.len(), "Retrieved recent estimates");
        Ok(estimates)
    }

    /// Newest first, only estimates with the given status.
    pub async fn list_by_status(&self, status: &str, limit: i64) -> Result<Vec<EstimateRecord>> {
        let estimates = sqlx::query_as::<_, EstimateRecord>(
            "SELECT * FROM estimates WHERE status = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(status)
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(estimates)
    }

    pub async fn list_by_chat(&self, chat_id: i64, limit: i64) -> Result<Vec<EstimateRecord>> {
        let estimates = sqlx::query_as::<_, EstimateRecord>(
            "SELECT * FROM estimates WHERE chat_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(chat_id)
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;

        debug!(chat_id, count = estimates.len(), "Retrieved estimates for chat");
        Ok(estimates)
    }

    /// Returns false when no estimate has this id.
    pub async fn update_status(&self, id: &str, status: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE estimates SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool_manager.pool())
            .await?;

        let updated = result.rows_affected() > 0;
        info!(id, status, updated, "Updated estimate status");
        Ok(updated)
    }

    pub async fn get_stats(&self) -> Result<EstimateStats> {
        let pool = self.pool_manager.pool();

        let (total_estimates, completed_estimates, total_value, average_cost, unique_chats): (
            i64,
            i64,
            Option<i64>,
            Option<f64>,
            i64,
        ) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(CASE WHEN status = ? THEN 1 END),
                   SUM(total_cost),
                   AVG(total_cost),
                   COUNT(DISTINCT chat_id)
            FROM estimates
            "#,
        )
        .bind(COMPLETED)
        .fetch_one(pool)
        .await?;

        let (first, last): (Option<String>, Option<String>) =
            sqlx::query_as("SELECT MIN(created_at), MAX(created_at) FROM estimates")
                .fetch_one(pool)
                .await?;

        Ok(EstimateStats {
            total_estimates,
            completed_estimates,
            total_value: total_value.unwrap_or(0),
            average_cost: average_cost.unwrap_or(0.0),
            unique_chats,
            first_estimate: parse_timestamp(first)?,
            last_estimate: parse_timestamp(last)?,
        })
    }

    /// Deletes estimates created more than `days` days ago; returns the number removed.
    pub async fn cleanup_older_than(&self, days: i64) -> Result<u64> {
        let cutoff = Duration::try_days(days)
            .and_then(|age| Utc::now().checked_sub_signed(age))
            .ok_or_else(|| StorageError::InvalidData(format!("cleanup age of {} days", days)))?;

        let result = sqlx::query("DELETE FROM estimates WHERE created_at < ?")
            .bind(cutoff)
            .execute(self.pool_manager.pool())
            .await?;

        info!(deleted = result.rows_affected(), days, "Deleted old estimates");
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl Repository<EstimateRecord> for EstimateRepository {
    async fn save(&self, entity: &EstimateRecord) -> Result<()> {
        EstimateRepository::save(self, entity).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<EstimateRecord>> {
        self.get_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<EstimateRecord>> {
        self.list_recent(i64::MAX).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM estimates WHERE id = ?")
            .bind(id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
