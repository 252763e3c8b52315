//! # Cart Commands
//!
//! Show, add, change quantities, remove, import a legacy browser cart,
//! and the GST price breakdown.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  aali cart add 4 -q 2                                                   │
//! │     │                                                                   │
//! │     ├── find_product("4") ──► None ──► NOT_FOUND                        │
//! │     ▼                                                                   │
//! │  store.update_cart(|c| c.add_item(line))                                │
//! │     ├── Err ──► CART_ERROR / VALIDATION_ERROR, nothing saved            │
//! │     ▼                                                                   │
//! │  cart_items rewritten ──► summary printed                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;

use aali_core::cart::{parse_legacy_cart, Cart};
use aali_core::catalog::find_product;
use aali_core::{CartBreakdown, CartLineItem, CoreError, MetalRateTable, Money};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::output::{pad_left, pad_right, CommandOutput};
use crate::state::StoreState;

/// Cart contents plus totals, as printed by `aali cart`.
#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    pub items: Vec<CartLineItem>,
    pub total_items: i64,
    pub total_price: Money,
}

impl CartSummary {
    fn of(cart: &Cart) -> Self {
        CartSummary {
            items: cart.items().to_vec(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }

    fn render(&self) -> String {
        if self.items.is_empty() {
            return "Your cart is empty".to_string();
        }
        let mut lines: Vec<String> = self
            .items
            .iter()
            .map(|item| {
                format!(
                    "{}  {}  {}  x{}  {}",
                    pad_left(&item.id, 2),
                    pad_right(&item.name, 28),
                    pad_right(item.metal.as_str(), 8),
                    pad_left(&item.quantity.to_string(), 2),
                    pad_left(&item.line_total().format_inr(), 11),
                )
            })
            .collect();
        lines.push(format!(
            "{} item(s), total {}",
            self.total_items,
            self.total_price.format_inr()
        ));
        lines.join("\n")
    }
}

fn summary(store: &StoreState) -> Result<CommandOutput, ApiError> {
    let summary = store.with_cart(CartSummary::of);
    CommandOutput::new(summary.render(), &summary)
}

fn product(id: &str) -> Result<aali_core::Product, ApiError> {
    find_product(id).ok_or_else(|| CoreError::ProductNotFound(id.to_string()).into())
}

pub fn show(store: &StoreState) -> Result<CommandOutput, ApiError> {
    summary(store)
}

/// Adds `quantity` units of a catalog product.
pub async fn add(store: &StoreState, id: &str, quantity: i64) -> Result<CommandOutput, ApiError> {
    if quantity < 1 {
        return Err(ApiError::validation("Quantity must be at least 1"));
    }
    let product = product(id)?;
    let mut line = CartLineItem::from_product(&product);
    line.quantity = quantity;

    store
        .update_cart(|cart| cart.add_item(line).map(|_| ()))
        .await?;
    info!(product_id = %id, quantity, "Added to cart");
    summary(store)
}

/// Changes a line's quantity by `delta`; zero removes the line.
pub async fn change(store: &StoreState, id: &str, delta: i64) -> Result<CommandOutput, ApiError> {
    store
        .update_cart(|cart| cart.change_quantity(id, delta).map(|_| ()))
        .await?;
    summary(store)
}

pub async fn set(store: &StoreState, id: &str, quantity: i64) -> Result<CommandOutput, ApiError> {
    store
        .update_cart(|cart| cart.set_quantity(id, quantity).map(|_| ()))
        .await?;
    summary(store)
}

pub async fn remove(store: &StoreState, id: &str) -> Result<CommandOutput, ApiError> {
    let removed = store.update_cart(|cart| cart.remove(id)).await?;
    info!(product_id = %removed.id, "Removed from cart");
    summary(store)
}

pub async fn clear(store: &StoreState) -> Result<CommandOutput, ApiError> {
    store
        .update_cart(|cart| {
            cart.clear();
            Ok(())
        })
        .await?;
    Ok(CommandOutput::message("Cart cleared"))
}

/// Outcome of `aali cart import`.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub warnings: Vec<String>,
    pub cart: CartSummary,
}

/// Imports a cart exported from the web storefront.
///
/// With `replace` the current cart is discarded; otherwise lines are merged
/// as if each had been added. Either way the cart is left unchanged if any
/// line is rejected.
pub async fn import(store: &StoreState, file: &Path, replace: bool) -> Result<CommandOutput, ApiError> {
    let raw = tokio::fs::read_to_string(file).await.map_err(|e| {
        ApiError::new(
            crate::error::ErrorCode::ImportError,
            format!("Cannot read {}: {}", file.display(), e),
        )
    })?;
    let legacy = parse_legacy_cart(&raw)?;
    for warning in &legacy.warnings {
        warn!(file = %file.display(), "{}", warning);
    }

    let imported = legacy.items.len();
    let items = legacy.items;
    store
        .update_cart(|cart| {
            let mut next = if replace {
                Cart::new()
            } else {
                cart.clone()
            };
            for item in items {
                next.add_item(item)?;
            }
            *cart = next;
            Ok(())
        })
        .await?;
    info!(imported, replace, "Legacy cart imported");

    let report = ImportReport {
        imported,
        warnings: legacy.warnings,
        cart: store.with_cart(CartSummary::of),
    };
    let mut text = format!("Imported {} line(s)", report.imported);
    for warning in &report.warnings {
        text.push_str(&format!("\n  warning: {}", warning));
    }
    text.push('\n');
    text.push_str(&report.cart.render());
    CommandOutput::new(text, &report)
}

/// Price breakdown of the whole cart.
pub fn breakdown(store: &StoreState, table: &MetalRateTable) -> Result<CommandOutput, ApiError> {
    let breakdown = store.with_cart(|cart| cart.breakdown(table));
    CommandOutput::new(render_breakdown(&breakdown), &breakdown)
}

fn render_breakdown(b: &CartBreakdown) -> String {
    if b.lines.is_empty() {
        return "Your cart is empty".to_string();
    }
    let row = |label: &str, amount: Money| {
        format!("{}{}", pad_right(label, 24), pad_left(&amount.format_inr(), 12))
    };

    let mut out: Vec<String> = Vec::new();
    for line in &b.lines {
        out.push(format!(
            "{} x{} ({})",
            line.name,
            line.quantity,
            line.metal.as_str()
        ));
        out.push(row("  Gold value", line.gold_value));
        out.push(row("  Making charges", line.making_charges));
        out.push(row("  GST", line.total_gst));
        out.push(row("  Line total", line.line_total));
    }
    let t = &b.totals;
    out.push(String::new());
    out.push(row("Gold value", t.gold_value));
    out.push(row("Making charges", t.making_charges));
    out.push(row("CGST (1.5%)", t.cgst));
    out.push(row("SGST (1.5%)", t.sgst));
    out.push(row("Total GST", t.total_gst));
    out.push(row("Cart total", t.cart_total));
    if t.total_savings.is_positive() {
        out.push(row("You save", t.total_savings));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use aali_db::{Database, DbConfig};

    async fn store() -> StoreState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        StoreState::load(db).await.unwrap()
    }

    #[tokio::test]
    async fn test_add_and_persist() {
        let store = store().await;
        let out = add(&store, "1", 2).await.unwrap();
        assert_eq!(out.json["total_items"], 2);
        assert_eq!(out.json["total_price"], 250_000);

        let saved = store.db().cart().load().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let err = add(&store().await, "99", 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_add_rejects_zero_quantity() {
        let err = add(&store().await, "1", 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_quantity_cap_leaves_cart_unchanged() {
        let store = store().await;
        add(&store, "3", 98).await.unwrap();
        let err = add(&store, "3", 5).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(store.with_cart(|c| c.total_items()), 98);
    }

    #[tokio::test]
    async fn test_dec_to_zero_removes_line() {
        let store = store().await;
        add(&store, "2", 1).await.unwrap();
        let out = change(&store, "2", -1).await.unwrap();
        assert_eq!(out.text, "Your cart is empty");
        assert!(store.db().cart().load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_line() {
        let err = remove(&store().await, "5").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_import_merges_and_reports_warnings() {
        let store = store().await;
        add(&store, "1", 1).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cart.json");
        tokio::fs::write(
            &file,
            r#"[{"id":"1","name":"Golden Sunburst Necklace","price":"125000","quantity":1,"metal":"22K","weight":12},
                {"id":"9","name":"Old Chain","price":40000,"quantity":"x","metal":"22K"}]"#,
        )
        .await
        .unwrap();

        let out = import(&store, &file, false).await.unwrap();
        assert_eq!(out.json["imported"], 2);
        assert!(!out.json["warnings"].as_array().unwrap().is_empty());
        assert_eq!(store.with_cart(|c| c.get("1").map(|i| i.quantity)), Some(2));
        assert_eq!(store.with_cart(|c| c.items().len()), 2);
    }

    #[tokio::test]
    async fn test_import_replace() {
        let store = store().await;
        add(&store, "2", 1).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cart.json");
        tokio::fs::write(&file, r#"[{"id":"4","name":"Heritage Gold Bangle","price":210000,"quantity":1}]"#)
            .await
            .unwrap();

        import(&store, &file, true).await.unwrap();
        let ids: Vec<String> = store.with_cart(|c| c.items().iter().map(|i| i.id.clone()).collect());
        assert_eq!(ids, vec!["4".to_string()]);
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let err = import(&store().await, Path::new("/no/such/cart.json"), false)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ImportError);
    }

    #[tokio::test]
    async fn test_breakdown_totals() {
        let store = store().await;
        add(&store, "1", 1).await.unwrap();
        let out = breakdown(&store, &MetalRateTable::standard()).unwrap();

        assert_eq!(out.json["totals"]["cart_total"], 125_000);
        assert_eq!(out.json["totals"]["cgst"], out.json["totals"]["sgst"]);
        assert!(out.text.contains("CGST (1.5%)"));
        assert!(out.text.contains("You save"));
    }

    #[tokio::test]
    async fn test_breakdown_empty_cart() {
        let out = breakdown(&store().await, &MetalRateTable::standard()).unwrap();
        assert_eq!(out.text, "Your cart is empty");
    }
}
