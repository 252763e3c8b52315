//! # Order Repository
//!
//! Placed orders and their lines.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. SAVE                                                                │
//! │     └── insert(order) → orders + order_items, one transaction           │
//! │         status: pending_sync                                            │
//! │                                                                         │
//! │  2. SUBMIT                                                              │
//! │     ├── accepted  → set_status(Submitted)                               │
//! │     └── failed    → stays pending_sync, queued in pending_orders        │
//! │                                                                         │
//! │  3. RETRY (aali orders sync)                                            │
//! │     └── accepted  → set_status(Submitted)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use aali_core::{
    CartLineItem, CustomerInfo, MetalType, Money, Order, OrderStatus, PaymentDetails,
    PriceBreakdown,
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_id: String,
    created_at: DateTime<Utc>,
    status: String,
    customer_json: String,
    payment_json: String,
    gold_value: i64,
    making_charges: i64,
    cgst: i64,
    sgst: i64,
    total_gst: i64,
    cart_total: i64,
    total_savings: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    product_id: String,
    name: String,
    price: i64,
    original_price: Option<i64>,
    quantity: i64,
    metal: String,
    weight_grams: Option<f64>,
    material: String,
    category: String,
}

impl From<OrderItemRow> for CartLineItem {
    fn from(row: OrderItemRow) -> Self {
        CartLineItem {
            id: row.product_id,
            name: row.name,
            price: Money::from_rupees(row.price),
            original_price: row.original_price.map(Money::from_rupees),
            quantity: row.quantity,
            metal: MetalType::from_tag_or_standard(&row.metal),
            weight_grams: row.weight_grams,
            material: row.material,
            category: row.category,
        }
    }
}

impl OrderRow {
    fn into_order(self, items: Vec<CartLineItem>) -> DbResult<Order> {
        let customer: CustomerInfo = serde_json::from_str(&self.customer_json)?;
        let payment: PaymentDetails = serde_json::from_str(&self.payment_json)?;

        Ok(Order {
            order_id: self.order_id,
            timestamp: self.created_at,
            customer,
            items,
            breakdown: PriceBreakdown {
                gold_value: Money::from_rupees(self.gold_value),
                making_charges: Money::from_rupees(self.making_charges),
                cgst: Money::from_rupees(self.cgst),
                sgst: Money::from_rupees(self.sgst),
                total_gst: Money::from_rupees(self.total_gst),
                cart_total: Money::from_rupees(self.cart_total),
                total_savings: Money::from_rupees(self.total_savings),
            },
            payment,
            status: OrderStatus::from_db(&self.status),
        })
    }
}

const ORDER_COLUMNS: &str = r#"
    order_id, created_at, status, customer_json, payment_json,
    gold_value, making_charges, cgst, sgst, total_gst, cart_total, total_savings
"#;

/// Repository for placed orders.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Saves an order and its lines atomically.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if the order id already exists.
    pub async fn insert(&self, order: &Order) -> DbResult<()> {
        debug!(order_id = %order.order_id, lines = order.items.len(), "Saving order");

        let customer_json = serde_json::to_string(&order.customer)?;
        let payment_json = serde_json::to_string(&order.payment)?;
        let b = &order.breakdown;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                order_id, created_at, status, customer_json, payment_json,
                gold_value, making_charges, cgst, sgst, total_gst,
                cart_total, total_savings
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&order.order_id)
        .bind(order.timestamp)
        .bind(order.status.as_str())
        .bind(customer_json)
        .bind(payment_json)
        .bind(b.gold_value.rupees())
        .bind(b.making_charges.rupees())
        .bind(b.cgst.rupees())
        .bind(b.sgst.rupees())
        .bind(b.total_gst.rupees())
        .bind(b.cart_total.rupees())
        .bind(b.total_savings.rupees())
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => {
                DbError::duplicate(field, order.order_id.clone())
            }
            other => other,
        })?;

        for (line_no, item) in order.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, line_no, product_id, name, price,
                    original_price, quantity, metal, weight_grams,
                    material, category
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&order.order_id)
            .bind(line_no as i64)
            .bind(&item.id)
            .bind(&item.name)
            .bind(item.price.rupees())
            .bind(item.original_price.map(|p| p.rupees()))
            .bind(item.quantity)
            .bind(item.metal.as_str())
            .bind(item.weight_grams)
            .bind(&item.material)
            .bind(&item.category)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets an order by id.
    pub async fn get(&self, order_id: &str) -> DbResult<Option<Order>> {
        debug!(order_id = %order_id, "Fetching order");

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE order_id = ?1",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.items_for(&row.order_id).await?;
                Ok(Some(row.into_order(items)?))
            }
            None => Ok(None),
        }
    }

    /// Gets an order by id, failing with `NotFound` when absent.
    pub async fn get_required(&self, order_id: &str) -> DbResult<Order> {
        self.get(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))
    }

    /// Lists the most recent orders, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Order>> {
        debug!(limit = limit, "Listing orders");

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders ORDER BY created_at DESC, order_id DESC LIMIT ?1",
            ORDER_COLUMNS
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items_for(&row.order_id).await?;
            orders.push(row.into_order(items)?);
        }
        Ok(orders)
    }

    /// Updates an order's submission status.
    pub async fn set_status(&self, order_id: &str, status: OrderStatus) -> DbResult<()> {
        debug!(order_id = %order_id, status = status.as_str(), "Updating order status");

        let result = sqlx::query("UPDATE orders SET status = ?2 WHERE order_id = ?1")
            .bind(order_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }
        Ok(())
    }

    /// Counts saved orders.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn items_for(&self, order_id: &str) -> DbResult<Vec<CartLineItem>> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT product_id, name, price, original_price, quantity,
                   metal, weight_grams, material, category
            FROM order_items
            WHERE order_id = ?1
            ORDER BY line_no ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CartLineItem::from).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use aali_core::catalog::find_product;
    use aali_core::metal::MetalRateTable;
    use aali_core::order::{build_order, mask_aadhaar};
    use aali_core::PaymentMethod;
    use chrono::TimeZone;

    async fn repo() -> OrderRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().orders()
    }

    fn order(id: &str, minute: u32) -> Order {
        let customer = CustomerInfo {
            name: "Asha Verma".to_string(),
            phone: "9876543210".to_string(),
            email: Some("asha@example.in".to_string()),
            address: "12 MG Road, Jaipur".to_string(),
            pincode: "302001".to_string(),
            aadhaar_masked: Some(mask_aadhaar("234567891234")),
        };
        let mut payment = PaymentDetails::new(PaymentMethod::Upi);
        payment.upi_id = Some("asha@okbank".to_string());

        let items = vec![
            CartLineItem::from_product(&find_product("1").unwrap()),
            CartLineItem::from_product(&find_product("3").unwrap()),
        ];
        build_order(
            id.to_string(),
            Utc.with_ymd_and_hms(2026, 3, 1, 10, minute, 0).unwrap(),
            customer,
            payment,
            &items,
            &MetalRateTable::standard(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        let placed = order("AALI1234560042", 0);
        repo.insert(&placed).await.unwrap();

        let loaded = repo.get("AALI1234560042").await.unwrap().unwrap();
        assert_eq!(loaded, placed);
        assert_eq!(loaded.status, OrderStatus::PendingSync);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let repo = repo().await;
        assert!(repo.get("AALI0000000000").await.unwrap().is_none());
        assert!(matches!(
            repo.get_required("AALI0000000000").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_duplicate_order_id_rejected() {
        let repo = repo().await;
        repo.insert(&order("AALI1234560042", 0)).await.unwrap();

        let err = repo.insert(&order("AALI1234560042", 5)).await.unwrap_err();
        match err {
            DbError::UniqueViolation { value, .. } => assert_eq!(value, "AALI1234560042"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let repo = repo().await;
        repo.insert(&order("AALI0000010001", 1)).await.unwrap();
        repo.insert(&order("AALI0000030003", 3)).await.unwrap();
        repo.insert(&order("AALI0000020002", 2)).await.unwrap();

        let ids: Vec<String> = repo
            .list_recent(2)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.order_id)
            .collect();
        assert_eq!(ids, vec!["AALI0000030003", "AALI0000020002"]);
    }

    #[tokio::test]
    async fn test_set_status() {
        let repo = repo().await;
        repo.insert(&order("AALI1234560042", 0)).await.unwrap();
        repo.set_status("AALI1234560042", OrderStatus::Submitted)
            .await
            .unwrap();

        let loaded = repo.get("AALI1234560042").await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Submitted);

        assert!(repo
            .set_status("AALI9999999999", OrderStatus::Submitted)
            .await
            .is_err());
    }
}
