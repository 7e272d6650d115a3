//! Order summary and the checkout payload.
//!
//! The checkout step reads the cart, adds flat shipping and tax, and posts an
//! order built directly from the line items. Payment and order persistence
//! happen on the backend; once it accepts the order the caller clears the
//! cart with [`CartStore::clear_cart`](crate::CartStore::clear_cart).

use nexus_market_core::{CurrencyCode, Price, PriceError, ProductId};
use serde::Serialize;
use thiserror::Error;

use crate::line_item::CartLineItem;
use crate::notify::NotificationSink;
use crate::storage::KeyValueStore;
use crate::store::CartStore;

/// Reasons an order could not be prepared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("missing shipping field: {0}")]
    MissingField(&'static str),

    #[error("order total out of range: {0}")]
    Total(#[from] PriceError),
}

/// Flat shipping and tax applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    pub shipping_flat_rate: Price,
    pub tax_flat_amount: Price,
    pub currency: CurrencyCode,
}

impl PricingConfig {
    /// Flat shipping charged per order.
    pub const DEFAULT_SHIPPING: i64 = 120;
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            shipping_flat_rate: Price::from_units(Self::DEFAULT_SHIPPING),
            tax_flat_amount: Price::ZERO,
            currency: CurrencyCode::default(),
        }
    }
}

/// Subtotal, charges and grand total for a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Summarize `items`. An empty cart carries no shipping or tax.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if a total does not fit.
    pub fn from_items(
        items: &[CartLineItem],
        pricing: &PricingConfig,
    ) -> Result<Self, PriceError> {
        let subtotal = items
            .iter()
            .try_fold(Price::ZERO, |total, line| total.checked_add(line.line_total()?))?;
        let (shipping, tax) = if items.is_empty() {
            (Price::ZERO, Price::ZERO)
        } else {
            (pricing.shipping_flat_rate, pricing.tax_flat_amount)
        };

        Ok(Self {
            subtotal,
            shipping,
            tax,
            total: Price::total([subtotal, shipping, tax])?,
        })
    }
}

/// Delivery details collected on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

impl ShippingDetails {
    /// Check that every field is filled in.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingField` naming the first blank field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let fields = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(CheckoutError::MissingField(field));
            }
        }
        Ok(())
    }

    /// Single-line address as the backend expects it.
    #[must_use]
    pub fn shipping_address(&self) -> String {
        format!(
            "{}, {} - {}",
            self.address.trim(),
            self.city.trim(),
            self.postal_code.trim()
        )
    }
}

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price frozen in the cart line.
    pub price: Price,
}

/// Order payload posted to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub products: Vec<OrderLine>,
    pub total_amount: Price,
    pub shipping_address: String,
    pub phone: String,
}

impl OrderRequest {
    /// Build the order for the current cart contents.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::EmptyCart` if the cart has no lines.
    /// - `CheckoutError::MissingField` if a shipping field is blank.
    /// - `CheckoutError::Total` if the order total does not fit.
    pub fn from_cart<S: KeyValueStore, N: NotificationSink>(
        cart: &CartStore<S, N>,
        details: &ShippingDetails,
        pricing: &PricingConfig,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        details.validate()?;

        let summary = OrderSummary::from_items(cart.items(), pricing)?;
        let products = cart
            .items()
            .iter()
            .map(|line| OrderLine {
                product_id: line.id.clone(),
                quantity: line.quantity,
                price: line.unit_price,
            })
            .collect();

        tracing::debug!(
            lines = cart.len(),
            total = %summary.total,
            "Prepared order request"
        );

        Ok(Self {
            products,
            total_amount: summary.total,
            shipping_address: details.shipping_address(),
            phone: details.phone.trim().to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::line_item::ProductSnapshot;
    use crate::notify::NullSink;
    use crate::storage::MemoryStore;

    fn product(id: &str, price: i64, stock: u32) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::parse(id).unwrap(),
            name: format!("Product {id}"),
            price: Price::from_units(price),
            image_url: None,
            stock,
        }
    }

    fn details() -> ShippingDetails {
        ShippingDetails {
            name: "Rahim Uddin".to_string(),
            phone: "01700000000".to_string(),
            address: "House 12, Road 5".to_string(),
            city: "Dhaka".to_string(),
            postal_code: "1207".to_string(),
        }
    }

    fn filled_cart() -> CartStore<MemoryStore, NullSink> {
        let mut cart = CartStore::open(MemoryStore::new(), NullSink);
        cart.add_to_cart(&product("p1", 500, 3)).unwrap();
        cart.add_quantity(&product("p2", 200, 5), 2).unwrap();
        cart
    }

    #[test]
    fn test_summary_adds_flat_shipping() {
        let cart = filled_cart();
        let summary = OrderSummary::from_items(cart.items(), &PricingConfig::default()).unwrap();

        assert_eq!(summary.subtotal, Price::from_units(900));
        assert_eq!(summary.shipping, Price::from_units(120));
        assert_eq!(summary.tax, Price::ZERO);
        assert_eq!(summary.total, Price::from_units(1020));
    }

    #[test]
    fn test_summary_of_empty_cart_is_zero() {
        let summary = OrderSummary::from_items(&[], &PricingConfig::default()).unwrap();
        assert_eq!(summary.total, Price::ZERO);
    }

    #[test]
    fn test_summary_reports_charge_overflow() {
        let cart = filled_cart();
        let pricing = PricingConfig {
            shipping_flat_rate: Price::new(rust_decimal::Decimal::MAX),
            ..PricingConfig::default()
        };

        assert_eq!(
            OrderSummary::from_items(cart.items(), &pricing),
            Err(PriceError::Overflow)
        );
        assert_eq!(
            OrderRequest::from_cart(&cart, &details(), &pricing),
            Err(CheckoutError::Total(PriceError::Overflow))
        );
    }

    #[test]
    fn test_order_request_from_cart() {
        let cart = filled_cart();
        let order = OrderRequest::from_cart(&cart, &details(), &PricingConfig::default()).unwrap();

        assert_eq!(order.products.len(), 2);
        assert_eq!(order.products[1].product_id.as_str(), "p2");
        assert_eq!(order.products[1].quantity, 2);
        assert_eq!(order.products[1].price, Price::from_units(200));
        assert_eq!(order.total_amount, Price::from_units(1020));
        assert_eq!(order.shipping_address, "House 12, Road 5, Dhaka - 1207");
    }

    #[test]
    fn test_order_request_json_shape() {
        let cart = filled_cart();
        let order = OrderRequest::from_cart(&cart, &details(), &PricingConfig::default()).unwrap();
        let value = serde_json::to_value(&order).unwrap();

        assert_eq!(value["products"][0]["product_id"], "p1");
        assert_eq!(value["products"][0]["quantity"], 1);
        assert!(value["products"][0]["price"].is_number());
        assert!(value["total_amount"].is_number());
        assert_eq!(value["phone"], "01700000000");
    }

    #[test]
    fn test_empty_cart_cannot_check_out() {
        let cart = CartStore::open(MemoryStore::new(), NullSink);
        assert_eq!(
            OrderRequest::from_cart(&cart, &details(), &PricingConfig::default()),
            Err(CheckoutError::EmptyCart)
        );
    }

    #[test]
    fn test_blank_field_is_reported() {
        let cart = filled_cart();
        let mut details = details();
        details.city = "  ".to_string();

        assert_eq!(
            OrderRequest::from_cart(&cart, &details, &PricingConfig::default()),
            Err(CheckoutError::MissingField("city"))
        );
    }
}
