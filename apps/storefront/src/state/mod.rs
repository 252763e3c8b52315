//! # State Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────┐      │
//! │  │       StoreState         │        │      ConfigState         │      │
//! │  │                          │        │                          │      │
//! │  │  Database (pool)         │        │  seller block            │      │
//! │  │  Arc<Mutex<Cart>>        │        │  database / spool paths  │      │
//! │  │  Arc<Mutex<Wishlist>>    │        │  history / sync limits   │      │
//! │  └──────────────────────────┘        └──────────────────────────┘      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • StoreState: cart and wishlist behind their own mutex; the lock is   │
//! │    released before the snapshot is written                             │
//! │  • ConfigState: read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod store;

pub use config::{ConfigError, ConfigState};
pub use store::StoreState;
