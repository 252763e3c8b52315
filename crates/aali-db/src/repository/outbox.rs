//! # Pending Order Outbox
//!
//! Orders whose submission failed wait here until a retry succeeds.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout                                                               │
//! │     │  submitter.submit(fields) ── Err ──► enqueue(order_id, fields)    │
//! │     ▼                                       "saved offline"             │
//! │  aali orders sync                                                       │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  get_pending(MAX_SUBMIT_ATTEMPTS, limit)                                │
//! │     │   WHERE synced_at IS NULL AND attempts < max                      │
//! │     ├── Ok  ──► mark_synced(order_id)                                   │
//! │     └── Err ──► mark_failed(order_id, error)  (attempts + 1)            │
//! │                                                                         │
//! │  Entries that reach the attempt limit stay in the table but are        │
//! │  skipped by get_pending.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use aali_core::PendingOrder;
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct PendingOrderRow {
    order_id: String,
    fields_json: String,
    created_at: DateTime<Utc>,
    attempts: i64,
    last_error: Option<String>,
}

impl TryFrom<PendingOrderRow> for PendingOrder {
    type Error = DbError;

    fn try_from(row: PendingOrderRow) -> DbResult<Self> {
        Ok(PendingOrder {
            order_id: row.order_id,
            fields: serde_json::from_str(&row.fields_json)?,
            created_at: row.created_at,
            attempts: u32::try_from(row.attempts).unwrap_or(u32::MAX),
            last_error: row.last_error,
        })
    }
}

/// Repository for the pending-order outbox.
#[derive(Debug, Clone)]
pub struct PendingOrderRepository {
    pool: SqlitePool,
}

impl PendingOrderRepository {
    /// Creates a new PendingOrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PendingOrderRepository { pool }
    }

    /// Queues an order's submission payload for a later retry.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if the order is already queued.
    pub async fn enqueue(
        &self,
        order_id: &str,
        fields: &[(String, String)],
    ) -> DbResult<PendingOrder> {
        debug!(order_id = %order_id, fields = fields.len(), "Queuing pending order");

        let entry = PendingOrder {
            order_id: order_id.to_string(),
            fields: fields.to_vec(),
            created_at: Utc::now(),
            attempts: 0,
            last_error: None,
        };

        sqlx::query(
            r#"
            INSERT INTO pending_orders (
                id, order_id, fields_json, created_at, attempts
            ) VALUES (?1, ?2, ?3, ?4, 0)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&entry.order_id)
        .bind(serde_json::to_string(&entry.fields)?)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, order_id),
            other => other,
        })?;

        Ok(entry)
    }

    /// Unsynced entries still under the attempt limit, oldest first.
    pub async fn get_pending(&self, max_attempts: u32, limit: u32) -> DbResult<Vec<PendingOrder>> {
        let rows = sqlx::query_as::<_, PendingOrderRow>(
            r#"
            SELECT order_id, fields_json, created_at, attempts, last_error
            FROM pending_orders
            WHERE synced_at IS NULL AND attempts < ?1
            ORDER BY created_at ASC
            LIMIT ?2
            "#,
        )
        .bind(i64::from(max_attempts))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Fetched pending orders");
        rows.into_iter().map(PendingOrder::try_from).collect()
    }

    /// Marks an entry as delivered.
    pub async fn mark_synced(&self, order_id: &str) -> DbResult<()> {
        let now = Utc::now();
        debug!(order_id = %order_id, "Pending order delivered");

        sqlx::query(
            r#"
            UPDATE pending_orders SET
                synced_at = ?2,
                last_attempt_at = ?2
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Records a failed retry.
    pub async fn mark_failed(&self, order_id: &str, error: &str) -> DbResult<()> {
        let now = Utc::now();
        debug!(order_id = %order_id, error = %error, "Pending order retry failed");

        sqlx::query(
            r#"
            UPDATE pending_orders SET
                attempts = attempts + 1,
                last_error = ?2,
                last_attempt_at = ?3
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .bind(error)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Counts undelivered entries, including ones past the attempt limit.
    pub async fn count_pending(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM pending_orders WHERE synced_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Counts undelivered entries that will no longer be retried.
    pub async fn count_exhausted(&self, max_attempts: u32) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM pending_orders WHERE synced_at IS NULL AND attempts >= ?1",
        )
        .bind(i64::from(max_attempts))
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Deletes delivered entries older than `days_old` days.
    ///
    /// Returns the number of deleted entries.
    pub async fn cleanup_synced(&self, days_old: u32) -> DbResult<u64> {
        let cutoff = Utc::now() - Duration::days(i64::from(days_old));
        let result = sqlx::query(
            "DELETE FROM pending_orders WHERE synced_at IS NOT NULL AND synced_at < ?1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> PendingOrderRepository {
        Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .pending_orders()
    }

    fn fields(order_id: &str) -> Vec<(String, String)> {
        vec![
            ("orderId".to_string(), order_id.to_string()),
            ("totalAmount".to_string(), "125000".to_string()),
        ]
    }

    #[tokio::test]
    async fn test_enqueue_and_get_pending() {
        let repo = repo().await;
        let queued = repo.enqueue("AALI0000010001", &fields("AALI0000010001")).await.unwrap();
        assert_eq!(queued.attempts, 0);

        let pending = repo.get_pending(10, 50).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].order_id, "AALI0000010001");
        assert_eq!(pending[0].fields, fields("AALI0000010001"));
        assert_eq!(repo.count_pending().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_enqueue_twice_is_duplicate() {
        let repo = repo().await;
        repo.enqueue("AALI0000010001", &fields("AALI0000010001")).await.unwrap();
        let err = repo
            .enqueue("AALI0000010001", &fields("AALI0000010001"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_mark_synced_removes_from_pending() {
        let repo = repo().await;
        repo.enqueue("AALI0000010001", &fields("AALI0000010001")).await.unwrap();
        repo.mark_synced("AALI0000010001").await.unwrap();

        assert!(repo.get_pending(10, 50).await.unwrap().is_empty());
        assert_eq!(repo.count_pending().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mark_failed_counts_attempts_until_skipped() {
        let repo = repo().await;
        repo.enqueue("AALI0000010001", &fields("AALI0000010001")).await.unwrap();

        for _ in 0..3 {
            repo.mark_failed("AALI0000010001", "endpoint unreachable")
                .await
                .unwrap();
        }

        let pending = repo.get_pending(10, 50).await.unwrap();
        assert_eq!(pending[0].attempts, 3);
        assert_eq!(pending[0].last_error.as_deref(), Some("endpoint unreachable"));

        // With a limit of 3 the entry is skipped but still counted
        assert!(repo.get_pending(3, 50).await.unwrap().is_empty());
        assert_eq!(repo.count_pending().await.unwrap(), 1);
        assert_eq!(repo.count_exhausted(3).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_cleanup_keeps_recent_and_unsynced() {
        let repo = repo().await;
        repo.enqueue("AALI0000010001", &fields("AALI0000010001")).await.unwrap();
        repo.enqueue("AALI0000020002", &fields("AALI0000020002")).await.unwrap();
        repo.mark_synced("AALI0000010001").await.unwrap();

        assert_eq!(repo.cleanup_synced(7).await.unwrap(), 0);
        assert_eq!(repo.count_pending().await.unwrap(), 1);
    }
}
