//! # Repository Module
//!
//! Database repository implementations for the storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StoreState / command                                                   │
//! │       │                                                                 │
//! │       │  db.cart().replace_all(cart.items())                            │
//! │       ▼                                                                 │
//! │  CartRepository                                                         │
//! │  ├── load(&self)                                                        │
//! │  ├── replace_all(&self, items)                                          │
//! │  └── clear(&self)                                                       │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CartRepository`](cart::CartRepository) - Cart snapshot
//! - [`WishlistRepository`](wishlist::WishlistRepository) - Wishlist snapshot
//! - [`OrderRepository`](order::OrderRepository) - Placed orders and their lines
//! - [`PendingOrderRepository`](outbox::PendingOrderRepository) - Failed submissions awaiting retry
//! - [`PreferenceRepository`](preferences::PreferenceRepository) - Small JSON settings

pub mod cart;
pub mod order;
pub mod outbox;
pub mod preferences;
pub mod wishlist;
