//! # aali-core: Pure Business Logic for the Aali Storefront
//!
//! Everything the storefront knows about jewelry pricing, carts, checkout
//! and invoices, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Aali Storefront Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    `aali` CLI (apps/storefront)                 │   │
//! │  │    catalog ──► cart ──► breakdown ──► checkout ──► invoice      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ aali-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   metal   │  │  pricing  │  │   cart    │  │   │
//! │  │   │   Money   │  │ RateTable │  │ Breakdown │  │ Wishlist  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │validation │  │   order   │  │  invoice  │  │   │
//! │  │   │  search   │  │   forms   │  │  payload  │  │   words   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    aali-db (Storage Layer)                      │   │
//! │  │         SQLite: cart, wishlist, orders, outbox, prefs          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Whole-rupee Money type with exact rational rounding
//! - [`metal`] - Metal types and the static rate table
//! - [`pricing`] - Reverse price breakdown (gold, making, CGST, SGST)
//! - [`cart`] - Cart and wishlist state, legacy cart import
//! - [`catalog`] - Product catalog, search, suggestions
//! - [`validation`] - Field and form validation
//! - [`order`] - Order ids, order building, submission payload
//! - [`invoice`] - Invoice document and text rendering
//! - [`account`] - Mocked registration and login
//!
//! ## Example Usage
//!
//! ```rust
//! use aali_core::cart::Cart;
//! use aali_core::catalog::find_product;
//! use aali_core::metal::MetalRateTable;
//!
//! let mut cart = Cart::new();
//! cart.add_product(&find_product("1").unwrap()).unwrap();
//!
//! let breakdown = cart.breakdown(&MetalRateTable::standard());
//! assert_eq!(breakdown.totals.cart_total.rupees(), 125_000);
//! assert_eq!(breakdown.totals.cgst, breakdown.totals.sgst);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod account;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod invoice;
pub mod metal;
pub mod money;
pub mod order;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError, ValidationErrors};
pub use metal::{MetalRate, MetalRateTable, MetalType};
pub use money::Money;
pub use pricing::{CartBreakdown, LineBreakdown, PriceBreakdown};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Jewelry is rarely bought in bulk; anything higher is almost always a
/// typing mistake.
pub const MAX_ITEM_QUANTITY: i64 = 99;

/// Maximum order submission attempts before an outbox entry is skipped.
pub const MAX_SUBMIT_ATTEMPTS: u32 = 10;
