//! # `aali` Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        aali (storefront CLI)                            │
//! │                                                                         │
//! │  main.rs ────► hands off to aali_storefront::run()                      │
//! │                                                                         │
//! │  lib.rs ─────► logging, config, database, store state, dispatch        │
//! │                                                                         │
//! │  commands/ ──► catalog, cart, wishlist, checkout, invoice, orders, ...  │
//! │                                                                         │
//! │  state/ ─────► StoreState, ConfigState                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    aali_storefront::run().await
}
