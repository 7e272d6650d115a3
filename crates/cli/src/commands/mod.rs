//! CLI command implementations.

pub mod cart;
pub mod checkout;

use nexus_market_cart::{CartStore, FileStore, TracingSink};

/// The cart as the CLI opens it.
pub type Cart = CartStore<FileStore, TracingSink>;
