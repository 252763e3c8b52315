//! # Order Commands
//!
//! History, the pending-order outbox, and retrying it.
//!
//! ## Sync
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pending_orders WHERE synced_at IS NULL AND attempts < 10               │
//! │     │  (oldest first, batch of sync_batch_size)                         │
//! │     ▼                                                                   │
//! │  submitter.submit(fields)                                               │
//! │     ├── Ok  ──► mark_synced + orders.status = submitted                 │
//! │     └── Err ──► mark_failed (attempts + 1, last_error)                  │
//! │  delivered entries older than 30 days are then removed                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use aali_core::{Order, OrderStatus, PendingOrder, MAX_SUBMIT_ATTEMPTS};
use serde::Serialize;
use tracing::{info, warn};

use super::AppContext;
use crate::error::ApiError;
use crate::output::{pad_left, pad_right, CommandOutput};

/// Delivered outbox entries are kept this long before cleanup.
const SYNCED_RETENTION_DAYS: u32 = 30;

/// Recent orders, newest first.
pub async fn list(ctx: &AppContext, limit: Option<u32>) -> Result<CommandOutput, ApiError> {
    let limit = limit.unwrap_or(ctx.config.order_history_limit);
    let orders = ctx.store.db().orders().list_recent(limit).await?;
    let text = if orders.is_empty() {
        "No orders yet".to_string()
    } else {
        orders.iter().map(order_row).collect::<Vec<_>>().join("\n")
    };
    CommandOutput::new(text, &orders)
}

fn order_row(order: &Order) -> String {
    let status = match order.status {
        OrderStatus::Submitted => "submitted",
        OrderStatus::PendingSync => "saved offline",
    };
    format!(
        "{}  {}  {}  {}  {}",
        order.order_id,
        order.timestamp.format("%d %b %Y %H:%M"),
        pad_left(&order.breakdown.cart_total.format_inr(), 11),
        pad_right(order.payment.method.as_str(), 10),
        status
    )
}

/// Orders still waiting in the outbox.
pub async fn pending(ctx: &AppContext) -> Result<CommandOutput, ApiError> {
    let entries = ctx
        .store
        .db()
        .pending_orders()
        .get_pending(MAX_SUBMIT_ATTEMPTS, ctx.config.sync_batch_size)
        .await?;
    let text = if entries.is_empty() {
        "No pending orders".to_string()
    } else {
        entries.iter().map(pending_row).collect::<Vec<_>>().join("\n")
    };
    CommandOutput::new(text, &entries)
}

fn pending_row(entry: &PendingOrder) -> String {
    let mut row = format!(
        "{}  queued {}  attempts {}",
        entry.order_id,
        entry.created_at.format("%d %b %Y %H:%M"),
        entry.attempts
    );
    if let Some(error) = &entry.last_error {
        row.push_str(&format!("  last error: {}", error));
    }
    row
}

/// Result of one `orders sync` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Entries that reached the attempt limit and are no longer retried.
    pub exhausted: i64,
}

/// Retries one batch of pending orders.
pub async fn sync(ctx: &AppContext) -> Result<CommandOutput, ApiError> {
    let db = ctx.store.db();
    let outbox = db.pending_orders();
    let entries = outbox
        .get_pending(MAX_SUBMIT_ATTEMPTS, ctx.config.sync_batch_size)
        .await?;

    let mut report = SyncReport {
        attempted: entries.len(),
        ..Default::default()
    };
    for entry in &entries {
        match ctx.submitter.submit(&entry.fields).await {
            Ok(()) => {
                outbox.mark_synced(&entry.order_id).await?;
                db.orders()
                    .set_status(&entry.order_id, OrderStatus::Submitted)
                    .await?;
                report.delivered += 1;
            }
            Err(e) => {
                warn!(order_id = %entry.order_id, attempts = entry.attempts + 1, error = %e, "Retry failed");
                outbox.mark_failed(&entry.order_id, &e.to_string()).await?;
                report.failed += 1;
            }
        }
    }
    report.exhausted = outbox.count_exhausted(MAX_SUBMIT_ATTEMPTS).await?;
    match outbox.cleanup_synced(SYNCED_RETENTION_DAYS).await {
        Ok(0) => {}
        Ok(removed) => info!(removed, "Old delivered entries removed from outbox"),
        Err(e) => warn!(error = %e, "Outbox cleanup failed"),
    }
    info!(
        attempted = report.attempted,
        delivered = report.delivered,
        failed = report.failed,
        "Outbox sync finished"
    );

    let mut text = format!(
        "Delivered {} of {} pending order(s)",
        report.delivered, report.attempted
    );
    if report.exhausted > 0 {
        text.push_str(&format!(
            "\n{} order(s) gave up after {} attempts",
            report.exhausted, MAX_SUBMIT_ATTEMPTS
        ));
    }
    CommandOutput::new(text, &report)
}
