//! # Store State
//!
//! The single store object owning the cart and the wishlist.
//!
//! ## Update Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  command                                                                │
//! │     │  store.update_cart(|cart| cart.add_product(&p))                   │
//! │     ▼                                                                   │
//! │  lock cart ──► apply ──► snapshot items ──► unlock                      │
//! │     │                                                                   │
//! │     ├── Err ──► returned, nothing written                               │
//! │     ▼                                                                   │
//! │  db.cart().replace_all(snapshot)                                        │
//! │     ├── Ok  ──► done                                                    │
//! │     └── Err ──► warn!, the update still succeeds                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Mutex;

use aali_core::cart::{Cart, Wishlist};
use aali_core::{CartLineItem, CoreResult, WishlistItem};
use aali_db::{Database, DbResult};
use tracing::{debug, warn};

/// Cart and wishlist state with write-behind persistence.
///
/// Commands only ever see `&AppContext`, so the collections sit behind a
/// `Mutex` for mutation through a shared reference. Nothing clones the
/// store; one command runs per process.
#[derive(Debug)]
pub struct StoreState {
    db: Database,
    cart: Mutex<Cart>,
    wishlist: Mutex<Wishlist>,
}

impl StoreState {
    /// Loads the saved cart and wishlist.
    pub async fn load(db: Database) -> DbResult<Self> {
        let cart = Cart::from_items(db.cart().load().await?);
        let wishlist = Wishlist::from_items(db.wishlist().load().await?);
        debug!(
            cart_lines = cart.items().len(),
            wishlist_items = wishlist.len(),
            "Store state loaded"
        );

        Ok(StoreState {
            db,
            cart: Mutex::new(cart),
            wishlist: Mutex::new(wishlist),
        })
    }

    /// The database behind this store.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with read access to the wishlist.
    pub fn with_wishlist<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Wishlist) -> R,
    {
        let wishlist = self.wishlist.lock().expect("Wishlist mutex poisoned");
        f(&wishlist)
    }

    /// Applies a cart update, then saves the cart if it succeeded.
    pub async fn update_cart<F, R>(&self, f: F) -> CoreResult<R>
    where
        F: FnOnce(&mut Cart) -> CoreResult<R>,
    {
        let (result, snapshot) = {
            let mut cart = self.cart.lock().expect("Cart mutex poisoned");
            let result = f(&mut cart)?;
            (result, cart.items().to_vec())
        };
        self.persist_cart(&snapshot).await;
        Ok(result)
    }

    /// Applies a wishlist update, then saves the wishlist if it succeeded.
    pub async fn update_wishlist<F, R>(&self, f: F) -> CoreResult<R>
    where
        F: FnOnce(&mut Wishlist) -> CoreResult<R>,
    {
        let (result, snapshot) = {
            let mut wishlist = self.wishlist.lock().expect("Wishlist mutex poisoned");
            let result = f(&mut wishlist)?;
            (result, wishlist.items().to_vec())
        };
        self.persist_wishlist(&snapshot).await;
        Ok(result)
    }

    /// Applies an update touching both lists (move to cart).
    ///
    /// Locks are taken wishlist first, then cart.
    pub async fn update_both<F, R>(&self, f: F) -> CoreResult<R>
    where
        F: FnOnce(&mut Wishlist, &mut Cart) -> CoreResult<R>,
    {
        let (result, wishlist_snapshot, cart_snapshot) = {
            let mut wishlist = self.wishlist.lock().expect("Wishlist mutex poisoned");
            let mut cart = self.cart.lock().expect("Cart mutex poisoned");
            let result = f(&mut wishlist, &mut cart)?;
            (result, wishlist.items().to_vec(), cart.items().to_vec())
        };
        self.persist_wishlist(&wishlist_snapshot).await;
        self.persist_cart(&cart_snapshot).await;
        Ok(result)
    }

    async fn persist_cart(&self, items: &[CartLineItem]) {
        if let Err(e) = self.db.cart().replace_all(items).await {
            warn!(error = %e, "Failed to save cart; keeping in-memory state");
        }
    }

    async fn persist_wishlist(&self, items: &[WishlistItem]) {
        if let Err(e) = self.db.wishlist().replace_all(items).await {
            warn!(error = %e, "Failed to save wishlist; keeping in-memory state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aali_core::catalog::find_product;
    use aali_core::CoreError;
    use aali_db::DbConfig;

    async fn store() -> StoreState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        StoreState::load(db).await.unwrap()
    }

    #[tokio::test]
    async fn test_cart_update_is_persisted() {
        let store = store().await;
        let ring = find_product("2").unwrap();
        store
            .update_cart(|cart| cart.add_product(&ring).map(|_| ()))
            .await
            .unwrap();

        let reloaded = StoreState::load(store.db().clone()).await.unwrap();
        assert_eq!(reloaded.with_cart(|c| c.total_items()), 1);
    }

    #[tokio::test]
    async fn test_failed_update_is_not_persisted() {
        let store = store().await;
        let err = store
            .update_cart(|cart| cart.remove("missing").map(|_| ()))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotInCart(_)));
        assert!(store.db().cart().load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_update() {
        let store = store().await;
        store.db().close().await;

        let necklace = find_product("1").unwrap();
        store
            .update_cart(|cart| cart.add_product(&necklace).map(|_| ()))
            .await
            .unwrap();
        assert_eq!(store.with_cart(|c| c.items().len()), 1);
    }

    #[tokio::test]
    async fn test_move_to_cart_persists_both() {
        let store = store().await;
        let bangle = find_product("4").unwrap();
        store
            .update_wishlist(|w| Ok(w.toggle(&bangle)))
            .await
            .unwrap();
        store
            .update_both(|w, c| w.move_to_cart(&bangle, c))
            .await
            .unwrap();

        let db = store.db();
        assert!(db.wishlist().load().await.unwrap().is_empty());
        assert_eq!(db.cart().load().await.unwrap()[0].id, "4");
    }
}
