//! NexusMarket cart - client-side cart state and order totals.
//!
//! The cart is a single-owner state container: one [`CartStore`] per browsing
//! session holds the ordered list of line items, writes the whole list to a
//! durable key-value slot after every mutation, and restores it on startup.
//!
//! # Architecture
//!
//! - [`store`] - The cart state machine and its derived aggregates
//! - [`storage`] - Durable key-value backends (in-memory, directory-backed)
//! - [`snapshot`] - JSON codec for the persisted line-item list
//! - [`notify`] - Fire-and-forget user notices (toasts)
//! - [`checkout`] - Order summary and the backend order payload
//! - [`config`] - Environment-driven configuration
//!
//! # Example
//!
//! ```rust
//! use nexus_market_cart::{CartStore, MemoryStore, NullSink, ProductSnapshot};
//! use nexus_market_core::{Price, ProductId};
//!
//! let mut cart = CartStore::open(MemoryStore::new(), NullSink);
//! let product = ProductSnapshot {
//!     id: ProductId::parse("p1").unwrap(),
//!     name: "Mechanical Keyboard".to_string(),
//!     price: Price::from_units(500),
//!     image_url: None,
//!     stock: 3,
//! };
//!
//! cart.add_to_cart(&product).unwrap();
//! cart.add_to_cart(&product).unwrap();
//!
//! assert_eq!(cart.cart_count(), 2);
//! assert_eq!(cart.cart_total(), Ok(Price::from_units(1000)));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod error;
pub mod line_item;
pub mod notify;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use checkout::{CheckoutError, OrderLine, OrderRequest, OrderSummary, PricingConfig, ShippingDetails};
pub use config::{CartConfig, ConfigError};
pub use error::CartError;
pub use line_item::{CartLineItem, ProductSnapshot};
pub use notify::{NotificationSink, Notice, NoticeLevel, NullSink, RecordingSink, TracingSink};
pub use snapshot::{Decoded, LineIssue, SnapshotError};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CartStore, DEFAULT_CART_KEY};
