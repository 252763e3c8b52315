//! # Invoice Command

use aali_core::invoice::{Invoice, SellerInfo};
use aali_db::Database;
use chrono::{DateTime, Utc};

use crate::error::{ApiError, ErrorCode};
use crate::output::CommandOutput;

/// Renders the invoice for `order_id`, or for the most recent order.
pub async fn invoice(
    db: &Database,
    seller: SellerInfo,
    order_id: Option<&str>,
    issued_at: DateTime<Utc>,
) -> Result<CommandOutput, ApiError> {
    let order = match order_id {
        Some(id) => db.orders().get_required(id).await?,
        None => db
            .orders()
            .list_recent(1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::new(ErrorCode::NotFound, "No orders placed yet"))?,
    };

    let invoice = Invoice::from_order(&order, seller, issued_at);
    CommandOutput::new(invoice.render_text(), &invoice)
}
