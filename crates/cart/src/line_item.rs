//! Cart line items and the product value object they are created from.

use nexus_market_core::{Price, PriceError, ProductId};
use serde::{Deserialize, Serialize};

/// Product data handed to the cart by the catalog or product page.
///
/// The cart never fetches products itself; whatever the caller passes in is
/// the snapshot the cart works with for that call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// First product image, if any.
    pub image_url: Option<String>,
    /// Current catalog stock.
    pub stock: u32,
}

/// One distinct product in the cart.
///
/// Field names on the wire match the snapshots written by the web client
/// (`_id`, `price`, `image`, `maxStock`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name, frozen at first add.
    pub name: String,
    /// Unit price, frozen at first add.
    #[serde(rename = "price")]
    pub unit_price: Price,
    #[serde(rename = "image", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub quantity: u32,
    /// Upper bound for `quantity`.
    #[serde(rename = "maxStock")]
    pub available_stock: u32,
}

impl CartLineItem {
    /// Create a line from a product snapshot.
    #[must_use]
    pub fn from_product(product: &ProductSnapshot, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            image_url: product.image_url.clone(),
            quantity,
            available_stock: product.stock,
        }
    }

    /// `unit_price × quantity`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the product does not fit.
    pub fn line_total(&self) -> Result<Price, PriceError> {
        self.unit_price.times(self.quantity)
    }

    /// `unit_price × available_stock`, the most this line can ever cost.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the product does not fit.
    pub fn max_line_total(&self) -> Result<Price, PriceError> {
        self.unit_price.times(self.available_stock)
    }

    /// Whether `quantity` is within `[1, available_stock]`.
    #[must_use]
    pub const fn is_within_bounds(&self) -> bool {
        self.quantity >= 1 && self.quantity <= self.available_stock
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product() -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::parse("p1").unwrap(),
            name: "USB-C Hub".to_string(),
            price: Price::from_units(500),
            image_url: Some("https://res.cloudinary.com/demo/hub.png".to_string()),
            stock: 3,
        }
    }

    #[test]
    fn test_from_product_copies_snapshot() {
        let line = CartLineItem::from_product(&product(), 2);
        assert_eq!(line.id.as_str(), "p1");
        assert_eq!(line.name, "USB-C Hub");
        assert_eq!(line.unit_price, Price::from_units(500));
        assert_eq!(line.quantity, 2);
        assert_eq!(line.available_stock, 3);
        assert_eq!(line.line_total(), Ok(Price::from_units(1000)));
        assert_eq!(line.max_line_total(), Ok(Price::from_units(1500)));
    }

    #[test]
    fn test_line_total_overflow() {
        let mut line = CartLineItem::from_product(&product(), 2);
        line.unit_price = Price::new(rust_decimal::Decimal::MAX);
        assert_eq!(line.line_total(), Err(PriceError::Overflow));
        assert_eq!(line.max_line_total(), Err(PriceError::Overflow));
    }

    #[test]
    fn test_bounds() {
        let mut line = CartLineItem::from_product(&product(), 1);
        assert!(line.is_within_bounds());
        line.quantity = 3;
        assert!(line.is_within_bounds());
        line.quantity = 4;
        assert!(!line.is_within_bounds());
        line.quantity = 0;
        assert!(!line.is_within_bounds());
    }

    #[test]
    fn test_wire_field_names() {
        let line = CartLineItem::from_product(&product(), 1);
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["_id"], "p1");
        assert_eq!(value["maxStock"], 3);
        assert_eq!(value["image"], "https://res.cloudinary.com/demo/hub.png");
        assert!(value["price"].is_number());
    }

    #[test]
    fn test_missing_image_deserializes() {
        let line: CartLineItem = serde_json::from_str(
            r#"{"_id":"p1","name":"Hub","price":500,"quantity":1,"maxStock":3}"#,
        )
        .unwrap();
        assert_eq!(line.image_url, None);

        let line: CartLineItem = serde_json::from_str(
            r#"{"_id":"p1","name":"Hub","price":500,"image":null,"quantity":1,"maxStock":3}"#,
        )
        .unwrap();
        assert_eq!(line.image_url, None);
    }
}
