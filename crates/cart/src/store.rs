//! The cart store.
//!
//! `CartStore` owns the line-item list for one browsing session. Every
//! mutation is a single synchronous read-modify-write on `&mut self`,
//! followed by exactly one whole-list write of the snapshot. Rejected
//! requests leave both the list and the snapshot untouched.

use nexus_market_core::{Price, PriceError, ProductId};
use tracing::instrument;

use crate::error::CartError;
use crate::line_item::{CartLineItem, ProductSnapshot};
use crate::notify::{Notice, NotificationSink, TracingSink};
use crate::snapshot;
use crate::storage::KeyValueStore;

/// Storage key the web client uses for the cart snapshot.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Session cart: line items, persistence and notices.
///
/// Construct one per session and pass it to whatever needs the cart.
#[derive(Debug)]
pub struct CartStore<S, N = TracingSink> {
    items: Vec<CartLineItem>,
    storage: S,
    notifier: N,
    key: String,
}

impl<S: KeyValueStore, N: NotificationSink> CartStore<S, N> {
    /// Open the cart stored under [`DEFAULT_CART_KEY`].
    pub fn open(storage: S, notifier: N) -> Self {
        Self::open_with_key(storage, notifier, DEFAULT_CART_KEY)
    }

    /// Open the cart stored under `key`.
    ///
    /// A missing, unreadable or malformed snapshot yields an empty cart.
    pub fn open_with_key(storage: S, notifier: N, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = restore(&storage, &key);
        Self {
            items,
            storage,
            notifier,
            key,
        }
    }

    // =========================================================================
    // Read model
    // =========================================================================

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Line for `product_id`, if present.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|line| &line.id == product_id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of `unit_price × quantity` over all lines.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the sum does not fit. The store
    /// refuses any line that could make the total at full stock overflow,
    /// so a cart it built never hits this.
    pub fn cart_total(&self) -> Result<Price, PriceError> {
        self.items
            .iter()
            .try_fold(Price::ZERO, |total, line| total.checked_add(line.line_total()?))
    }

    /// Total number of units (not distinct lines).
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Storage key of the snapshot.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of `product`.
    ///
    /// # Errors
    ///
    /// See [`CartStore::add_quantity`].
    pub fn add_to_cart(&mut self, product: &ProductSnapshot) -> Result<u32, CartError> {
        self.add_quantity(product, 1)
    }

    /// Add `quantity` units of `product`, merging into an existing line.
    ///
    /// On an existing line the stock bound is the `product.stock` passed in
    /// now; a successful add refreshes the line's stored stock to it. Name,
    /// price and image stay as they were at first insert.
    ///
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// - `CartError::InvalidQuantity` if `quantity` is zero.
    /// - `CartError::OutOfStock` if the product is new to the cart and has no stock.
    /// - `CartError::StockExceeded` if the resulting quantity is above `product.stock`.
    /// - `CartError::NegativePrice` if the product is new to the cart and priced below zero.
    /// - `CartError::TotalOverflow` if the cart total at full stock would no longer fit.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_quantity(
        &mut self,
        product: &ProductSnapshot,
        quantity: u32,
    ) -> Result<u32, CartError> {
        match self.apply_add(product, quantity) {
            Ok(new_quantity) => {
                self.persist();
                tracing::debug!(quantity = new_quantity, "Added to cart");
                self.notifier.notify(&Notice::success("Added to cart"));
                Ok(new_quantity)
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Remove the line for `product_id`.
    ///
    /// Removing a product that is not in the cart is a no-op, not an error.
    /// Returns whether a line was removed.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| &line.id != product_id);
        let removed = self.items.len() != before;

        self.persist();
        if removed {
            self.notifier.notify(&Notice::success("Removed from cart"));
        }
        removed
    }

    /// Set the quantity of an existing line.
    ///
    /// Returns `Ok(false)` if `product_id` is not in the cart.
    ///
    /// # Errors
    ///
    /// - `CartError::StockExceeded` if `quantity` is above the line's stock.
    /// - `CartError::InvalidQuantity` if `quantity` is zero. No notice is
    ///   emitted for this one; the UI disables the control that produces it.
    #[instrument(skip(self))]
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<bool, CartError> {
        let Some(line) = self.items.iter_mut().find(|line| &line.id == product_id) else {
            return Ok(false);
        };

        if quantity > line.available_stock {
            let err = CartError::StockExceeded {
                product_id: product_id.clone(),
                requested: quantity,
                available: line.available_stock,
            };
            return Err(self.reject(err));
        }
        if quantity < 1 {
            let err = CartError::InvalidQuantity {
                product_id: product_id.clone(),
                requested: quantity,
            };
            return Err(self.reject(err));
        }

        line.quantity = quantity;
        self.persist();
        Ok(true)
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.persist();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn apply_add(&mut self, product: &ProductSnapshot, quantity: u32) -> Result<u32, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity {
                product_id: product.id.clone(),
                requested: quantity,
            });
        }

        let existing = self.get(&product.id).map(|line| (line.quantity, line.unit_price));
        let (requested, unit_price) = match existing {
            Some((current, unit_price)) => {
                let requested = current.saturating_add(quantity);
                if requested > product.stock {
                    return Err(CartError::StockExceeded {
                        product_id: product.id.clone(),
                        requested,
                        available: product.stock,
                    });
                }
                (requested, unit_price)
            }
            None => {
                if product.price.is_negative() {
                    return Err(CartError::NegativePrice {
                        product_id: product.id.clone(),
                    });
                }
                if product.stock == 0 {
                    return Err(CartError::OutOfStock {
                        product_id: product.id.clone(),
                    });
                }
                if quantity > product.stock {
                    return Err(CartError::StockExceeded {
                        product_id: product.id.clone(),
                        requested: quantity,
                        available: product.stock,
                    });
                }
                (quantity, product.price)
            }
        };

        // Every line may later be raised to its stock bound, so the total at
        // full stock has to stay representable.
        let max_total = self
            .items
            .iter()
            .filter(|line| line.id != product.id)
            .try_fold(Price::ZERO, |total, line| total.checked_add(line.max_line_total()?))
            .and_then(|total| total.checked_add(unit_price.times(product.stock)?));
        if max_total.is_err() {
            return Err(CartError::TotalOverflow {
                product_id: product.id.clone(),
            });
        }

        if let Some(line) = self.items.iter_mut().find(|line| line.id == product.id) {
            line.quantity = requested;
            line.available_stock = product.stock;
        } else {
            self.items.push(CartLineItem::from_product(product, quantity));
        }
        Ok(requested)
    }

    /// Report a rejected request and hand the error back.
    fn reject(&self, err: CartError) -> CartError {
        tracing::debug!(error = %err, "Cart request rejected");
        let message = match &err {
            CartError::StockExceeded { available, .. } => {
                Some(format!("Only {available} left in stock"))
            }
            CartError::OutOfStock { .. } => Some("This product is out of stock".to_string()),
            CartError::NegativePrice { .. } | CartError::TotalOverflow { .. } => {
                Some("This product cannot be added to the cart".to_string())
            }
            CartError::InvalidQuantity { .. } => None,
        };
        if let Some(message) = message {
            self.notifier.notify(&Notice::error(message));
        }
        err
    }

    /// Overwrite the snapshot with the current list.
    ///
    /// Write failures are logged; the in-memory list stays authoritative.
    fn persist(&self) {
        let raw = match snapshot::encode(&self.items) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode cart snapshot");
                return;
            }
        };

        if let Err(e) = self.storage.set(&self.key, &raw) {
            tracing::error!(error = %e, key = %self.key, "Failed to persist cart snapshot");
        }
    }
}

/// Load the snapshot stored under `key`, falling back to an empty list.
fn restore<S: KeyValueStore>(storage: &S, key: &str) -> Vec<CartLineItem> {
    match storage.get(key) {
        Ok(Some(raw)) => match snapshot::decode(&raw) {
            Ok(decoded) => {
                for issue in &decoded.issues {
                    tracing::warn!(
                        key,
                        product_id = %issue.product_id(),
                        %issue,
                        "Repaired cart snapshot"
                    );
                }
                tracing::debug!(key, lines = decoded.items.len(), "Restored cart snapshot");
                decoded.items
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding malformed cart snapshot");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read cart snapshot");
            Vec::new()
        }
    }
}
