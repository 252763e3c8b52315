//! # Wishlist Repository
//!
//! Snapshot persistence for the wishlist, same shape as the cart.

use aali_core::{Money, WishlistItem};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

#[derive(Debug, sqlx::FromRow)]
struct WishlistRow {
    id: String,
    name: String,
    price: i64,
    material: String,
    weight_label: String,
}

impl From<WishlistRow> for WishlistItem {
    fn from(row: WishlistRow) -> Self {
        WishlistItem {
            id: row.id,
            name: row.name,
            price: Money::from_rupees(row.price),
            material: row.material,
            weight_label: row.weight_label,
        }
    }
}

/// Repository for the persisted wishlist.
#[derive(Debug, Clone)]
pub struct WishlistRepository {
    pool: SqlitePool,
}

impl WishlistRepository {
    pub fn new(pool: SqlitePool) -> Self {
        WishlistRepository { pool }
    }

    /// Loads the saved wishlist in the order items were added.
    pub async fn load(&self) -> DbResult<Vec<WishlistItem>> {
        let rows = sqlx::query_as::<_, WishlistRow>(
            r#"
            SELECT id, name, price, material, weight_label
            FROM wishlist_items
            ORDER BY position ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded wishlist");
        Ok(rows.into_iter().map(WishlistItem::from).collect())
    }

    /// Replaces the saved wishlist with `items`.
    pub async fn replace_all(&self, items: &[WishlistItem]) -> DbResult<()> {
        debug!(count = items.len(), "Saving wishlist snapshot");
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM wishlist_items")
            .execute(&mut *tx)
            .await?;

        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO wishlist_items (
                    id, position, name, price, material, weight_label, added_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&item.id)
            .bind(position as i64)
            .bind(&item.name)
            .bind(item.price.rupees())
            .bind(&item.material)
            .bind(&item.weight_label)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
