//! # Order Submission
//!
//! The order endpoint is an outside collaborator: it takes the flat
//! submission fields and either accepts them or fails. Checkout never
//! fails because of it; a rejected order goes to the pending outbox.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       OrderSubmitter (trait)                            │
//! │                                                                         │
//! │   ┌──────────────────────────┐      ┌──────────────────────────┐       │
//! │   │     SpoolSubmitter       │      │    OfflineSubmitter      │       │
//! │   │  writes <orderId>.json   │      │  always unavailable      │       │
//! │   │  into AALI_SUBMIT_DIR    │      │  (no endpoint set)       │       │
//! │   └──────────────────────────┘      └──────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Why an order could not be delivered.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// No endpoint is configured, or it refused the order.
    #[error("Order endpoint unavailable: {0}")]
    Unavailable(String),

    /// The payload has no `orderId` field.
    #[error("Submission payload is missing orderId")]
    MissingOrderId,

    #[error("Failed to write order: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode order: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Delivers an order's submission fields.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Sends one order. `Ok` means the endpoint accepted it.
    async fn submit(&self, fields: &[(String, String)]) -> Result<(), SubmitError>;
}

/// Picks the submitter for a configured spool directory.
pub fn submitter_for(submit_dir: Option<&Path>) -> Box<dyn OrderSubmitter> {
    match submit_dir {
        Some(dir) => Box::new(SpoolSubmitter::new(dir)),
        None => Box::new(OfflineSubmitter),
    }
}

fn order_id(fields: &[(String, String)]) -> Option<&str> {
    fields
        .iter()
        .find(|(k, _)| k == "orderId")
        .map(|(_, v)| v.as_str())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Spool
// =============================================================================

/// Writes each order as a JSON object into a directory picked up by the
/// shop's order desk.
#[derive(Debug, Clone)]
pub struct SpoolSubmitter {
    dir: PathBuf,
}

impl SpoolSubmitter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SpoolSubmitter { dir: dir.into() }
    }

    /// Spool file for an order id.
    pub fn path_for(&self, order_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", order_id))
    }
}

#[async_trait]
impl OrderSubmitter for SpoolSubmitter {
    fn name(&self) -> &str {
        "spool"
    }

    async fn submit(&self, fields: &[(String, String)]) -> Result<(), SubmitError> {
        let order_id = order_id(fields).ok_or(SubmitError::MissingOrderId)?;

        let body: Map<String, Value> = fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        let json = serde_json::to_vec_pretty(&body)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(order_id);
        // Write then rename so the desk never reads half a file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(order_id = %order_id, path = %path.display(), "Order spooled");
        Ok(())
    }
}

// =============================================================================
// Offline
// =============================================================================

/// Used when no endpoint is configured: every order is saved offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSubmitter;

#[async_trait]
impl OrderSubmitter for OfflineSubmitter {
    fn name(&self) -> &str {
        "offline"
    }

    async fn submit(&self, _fields: &[(String, String)]) -> Result<(), SubmitError> {
        Err(SubmitError::Unavailable(
            "no submission endpoint configured".to_string(),
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
