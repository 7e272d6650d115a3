//! Cart mutation errors.
//!
//! Every variant is a local, non-fatal rejection: the store returns it without
//! touching the line-item list or the persisted snapshot.

use nexus_market_core::ProductId;
use thiserror::Error;

/// Reasons a cart mutation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The requested quantity is above the known stock for the product.
    #[error("only {available} of {product_id} left in stock (requested {requested})")]
    StockExceeded {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// A new line was requested for a product with no stock.
    #[error("{product_id} is out of stock")]
    OutOfStock { product_id: ProductId },

    /// The requested quantity is below one.
    #[error("invalid quantity {requested} for {product_id}")]
    InvalidQuantity {
        product_id: ProductId,
        requested: u32,
    },

    /// The product's unit price is below zero.
    #[error("{product_id} has a negative price")]
    NegativePrice { product_id: ProductId },

    /// Accepting the request could push the cart total out of range.
    #[error("adding {product_id} could overflow the cart total")]
    TotalOverflow { product_id: ProductId },
}

impl CartError {
    /// Product the rejected request was about.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        match self {
            Self::StockExceeded { product_id, .. }
            | Self::OutOfStock { product_id }
            | Self::InvalidQuantity { product_id, .. }
            | Self::NegativePrice { product_id }
            | Self::TotalOverflow { product_id } => product_id,
        }
    }
}
