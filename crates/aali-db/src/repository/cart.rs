//! # Cart Repository
//!
//! Persists the cart as a snapshot. Every update rewrites the table inside
//! one transaction, so a reader never sees half a cart and the last write
//! wins.

use aali_core::{CartLineItem, MetalType, Money};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Row shape of `cart_items`.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: String,
    name: String,
    price: i64,
    original_price: Option<i64>,
    quantity: i64,
    metal: String,
    weight_grams: Option<f64>,
    material: String,
    category: String,
}

impl From<CartItemRow> for CartLineItem {
    fn from(row: CartItemRow) -> Self {
        CartLineItem {
            id: row.id,
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

/// Repository for the persisted cart.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Loads the saved cart in display order.
    pub async fn load(&self) -> DbResult<Vec<CartLineItem>> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            r#"
            SELECT id, name, price, original_price, quantity,
                   metal, weight_grams, material, category
            FROM cart_items
            ORDER BY position ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded cart");
        Ok(rows.into_iter().map(CartLineItem::from).collect())
    }

    /// Replaces the saved cart with `items`.
    pub async fn replace_all(&self, items: &[CartLineItem]) -> DbResult<()> {
        debug!(count = items.len(), "Saving cart snapshot");
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cart_items")
            .execute(&mut *tx)
            .await?;

        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO cart_items (
                    id, position, name, price, original_price, quantity,
                    metal, weight_grams, material, category, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )
            .bind(&item.id)
            .bind(position as i64)
            .bind(&item.name)
            .bind(item.price.rupees())
            .bind(item.original_price.map(|p| p.rupees()))
            .bind(item.quantity)
            .bind(item.metal.as_str())
            .bind(item.weight_grams)
            .bind(&item.material)
            .bind(&item.category)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Removes every saved line.
    pub async fn clear(&self) -> DbResult<()> {
        debug!("Clearing saved cart");
        sqlx::query("DELETE FROM cart_items")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
