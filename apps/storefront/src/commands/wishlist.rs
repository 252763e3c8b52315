//! # Wishlist Commands

use aali_core::catalog::find_product;
use aali_core::cart::Wishlist;
use aali_core::{CoreError, WishlistItem};
use serde::Serialize;
use tracing::info;

use crate::error::ApiError;
use crate::output::{pad_left, pad_right, CommandOutput};
use crate::state::StoreState;

fn render(items: &[WishlistItem]) -> String {
    if items.is_empty() {
        return "Your wishlist is empty".to_string();
    }
    items
        .iter()
        .map(|item| {
            format!(
                "{}  {}  {}  {}",
                pad_left(&item.id, 2),
                pad_right(&item.name, 28),
                pad_right(&item.material, 22),
                pad_left(&item.price.format_inr(), 10),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn listing(store: &StoreState) -> Result<CommandOutput, ApiError> {
    let items = store.with_wishlist(|w: &Wishlist| w.items().to_vec());
    CommandOutput::new(render(&items), &items)
}

pub fn show(store: &StoreState) -> Result<CommandOutput, ApiError> {
    listing(store)
}

#[derive(Debug, Serialize)]
struct ToggleOutcome {
    id: String,
    saved: bool,
    count: usize,
}

/// Saves the product if absent, removes it if present.
pub async fn toggle(store: &StoreState, id: &str) -> Result<CommandOutput, ApiError> {
    let product = find_product(id).ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
    let (saved, count) = store
        .update_wishlist(|w| {
            let saved = w.toggle(&product);
            Ok((saved, w.len()))
        })
        .await?;
    info!(product_id = %id, saved, "Wishlist toggled");

    let text = if saved {
        format!("Saved {} to your wishlist", product.name)
    } else {
        format!("Removed {} from your wishlist", product.name)
    };
    CommandOutput::new(
        text,
        &ToggleOutcome {
            id: product.id,
            saved,
            count,
        },
    )
}

/// Moves a saved product into the cart. Nothing changes if the cart
/// rejects it.
pub async fn move_to_cart(store: &StoreState, id: &str) -> Result<CommandOutput, ApiError> {
    let product = find_product(id).ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
    store
        .update_both(|wishlist, cart| wishlist.move_to_cart(&product, cart))
        .await?;
    info!(product_id = %id, "Moved from wishlist to cart");
    Ok(CommandOutput::message(format!(
        "Moved {} to your cart",
        product.name
    )))
}

pub async fn clear(store: &StoreState) -> Result<CommandOutput, ApiError> {
    store
        .update_wishlist(|w| {
            w.clear();
            Ok(())
        })
        .await?;
    Ok(CommandOutput::message("Wishlist cleared"))
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
    async fn test_toggle_twice() {
        let store = store().await;
        let out = toggle(&store, "5").await.unwrap();
        assert_eq!(out.json["saved"], true);
        assert_eq!(store.db().wishlist().load().await.unwrap().len(), 1);

        let out = toggle(&store, "5").await.unwrap();
        assert_eq!(out.json["saved"], false);
        assert_eq!(out.json["count"], 0);
        assert!(store.db().wishlist().load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_move_to_cart() {
        let store = store().await;
        toggle(&store, "4").await.unwrap();
        move_to_cart(&store, "4").await.unwrap();

        assert!(store.with_wishlist(|w| w.is_empty()));
        assert_eq!(store.with_cart(|c| c.total_items()), 1);
        assert_eq!(store.db().cart().load().await.unwrap()[0].id, "4");
        assert!(store.db().wishlist().load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_move_unsaved_product() {
        let err = move_to_cart(&store().await, "4").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_show_and_clear() {
        let store = store().await;
        toggle(&store, "1").await.unwrap();
        assert!(show(&store).unwrap().text.contains("Golden Sunburst Necklace"));

        clear(&store).await.unwrap();
        assert_eq!(show(&store).unwrap().text, "Your wishlist is empty");
    }
}
