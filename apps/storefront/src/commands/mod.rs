//! # Storefront Commands
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (AppContext)
//! ├── catalog.rs   ◄─── catalog, search, recent searches, rates
//! ├── cart.rs      ◄─── cart manipulation, legacy import, breakdown
//! ├── wishlist.rs  ◄─── wishlist toggle / move to cart
//! ├── checkout.rs  ◄─── draft, validation, order placement
//! ├── invoice.rs   ◄─── invoice rendering
//! ├── orders.rs    ◄─── history, pending outbox, retry
//! └── account.rs   ◄─── mocked register / login / logout
//! ```
//!
//! Each command takes only the state it needs and returns a
//! [`CommandOutput`](crate::output::CommandOutput) or an
//! [`ApiError`](crate::error::ApiError).

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod invoice;
pub mod orders;
pub mod wishlist;

use aali_core::MetalRateTable;

use crate::state::{ConfigState, StoreState};
use crate::submit::OrderSubmitter;

/// Everything a command can ask for.
pub struct AppContext {
    pub config: ConfigState,
    pub store: StoreState,
    pub submitter: Box<dyn OrderSubmitter>,
    pub rates: MetalRateTable,
}
