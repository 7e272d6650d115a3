//! JSON codec for the persisted cart snapshot.
//!
//! The snapshot is the whole line-item list serialized as a JSON array. It is
//! always written in full. A value that does not parse is rejected as a whole;
//! a value that parses is checked line by line, and a line that breaks the
//! cart invariants is repaired or dropped on its own so the rest of the cart
//! survives.

use std::collections::HashSet;

use nexus_market_core::{Price, ProductId};
use thiserror::Error;

use crate::line_item::CartLineItem;

/// Reasons a stored snapshot could not be restored.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The stored value is not a JSON array of line items.
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A stored line that was repaired or dropped while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineIssue {
    /// A later line repeated a product ID; it was dropped.
    #[error("duplicate line for product {0} dropped")]
    Duplicate(ProductId),

    /// The line had quantity zero; it was dropped.
    #[error("line for {0} with quantity 0 dropped")]
    ZeroQuantity(ProductId),

    /// The line's unit price was negative; it was dropped.
    #[error("line for {0} with negative price dropped")]
    NegativePrice(ProductId),

    /// The line could push the cart total out of range; it was dropped.
    #[error("line for {0} dropped: cart total would overflow")]
    TotalOverflow(ProductId),

    /// The quantity was above `maxStock`; the stock bound was raised to it.
    ///
    /// Older clients checked re-adds against the live stock without updating
    /// the stored bound, so this state is legitimate.
    #[error("stock bound for {product_id} raised from {available_stock} to {quantity}")]
    StockRaised {
        product_id: ProductId,
        quantity: u32,
        available_stock: u32,
    },
}

impl LineIssue {
    /// Product of the affected line.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        match self {
            Self::Duplicate(product_id)
            | Self::ZeroQuantity(product_id)
            | Self::NegativePrice(product_id)
            | Self::TotalOverflow(product_id)
            | Self::StockRaised { product_id, .. } => product_id,
        }
    }
}

/// Lines restored from a snapshot, plus what had to be fixed on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub items: Vec<CartLineItem>,
    pub issues: Vec<LineIssue>,
}

/// Serialize the line-item list.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn encode(items: &[CartLineItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Deserialize a stored line-item list and bring every line within the
/// cart invariants.
///
/// A list that already satisfies them comes back unchanged with no issues.
///
/// # Errors
///
/// Returns `SnapshotError::Json` if the value is not a JSON array of line
/// items (including lines with a blank product ID).
pub fn decode(raw: &str) -> Result<Decoded, SnapshotError> {
    let stored: Vec<CartLineItem> = serde_json::from_str(raw)?;

    let mut decoded = Decoded {
        items: Vec::with_capacity(stored.len()),
        issues: Vec::new(),
    };
    let mut seen = HashSet::with_capacity(stored.len());
    // Running sum of unit_price × maxStock over the kept lines.
    let mut max_total = Price::ZERO;

    for mut item in stored {
        if seen.contains(&item.id) {
            decoded.issues.push(LineIssue::Duplicate(item.id));
            continue;
        }
        if item.quantity == 0 {
            decoded.issues.push(LineIssue::ZeroQuantity(item.id));
            continue;
        }
        if item.unit_price.is_negative() {
            decoded.issues.push(LineIssue::NegativePrice(item.id));
            continue;
        }
        if item.quantity > item.available_stock {
            decoded.issues.push(LineIssue::StockRaised {
                product_id: item.id.clone(),
                quantity: item.quantity,
                available_stock: item.available_stock,
            });
            item.available_stock = item.quantity;
        }
        let Ok(next) = item
            .max_line_total()
            .and_then(|line_max| max_total.checked_add(line_max))
        else {
            decoded.issues.push(LineIssue::TotalOverflow(item.id));
            continue;
        };

        max_total = next;
        seen.insert(item.id.clone());
        decoded.items.push(item);
    }

    Ok(decoded)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use super::*;

    fn line(id: &str, cents: i64, quantity: u32, stock: u32) -> CartLineItem {
        CartLineItem {
            id: ProductId::parse(id).unwrap(),
            name: format!("Product {id}"),
            unit_price: Price::new(Decimal::new(cents, 2)),
            image_url: None,
            quantity,
            available_stock: stock,
        }
    }

    #[test]
    fn test_empty_list_encodes_as_empty_array() {
        assert_eq!(encode(&[]).unwrap(), "[]");
        assert_eq!(decode("[]").unwrap(), Decoded::default());
    }

    #[test]
    fn test_decode_web_client_snapshot() {
        let raw = r#"[
            {"_id":"65a1","name":"Laptop Stand","price":1450,"image":"https://placehold.co/600x400","quantity":2,"maxStock":7},
            {"_id":"65a2","name":"Cable","price":99.5,"quantity":1,"maxStock":1}
        ]"#;

        let decoded = decode(raw).unwrap();
        assert!(decoded.issues.is_empty());
        let items = decoded.items;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].unit_price, Price::from_units(1450));
        assert_eq!(items[0].image_url.as_deref(), Some("https://placehold.co/600x400"));
        assert_eq!(items[1].unit_price, Price::new(Decimal::new(995, 1)));
        assert_eq!(items[1].image_url, None);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("{not json"), Err(SnapshotError::Json(_))));
        assert!(matches!(decode("{}"), Err(SnapshotError::Json(_))));
        assert!(matches!(decode(r#"[{"_id":"p1"}]"#), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_blank_id() {
        let raw = r#"[{"_id":"  ","name":"Hub","price":500,"quantity":1,"maxStock":3}]"#;
        assert!(matches!(decode(raw), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn test_decode_drops_later_duplicate() {
        let raw = encode(&[line("p1", 100, 1, 2), line("p1", 300, 2, 2)]).unwrap();
        let decoded = decode(&raw).unwrap();

        assert_eq!(decoded.items, vec![line("p1", 100, 1, 2)]);
        assert_eq!(decoded.issues, vec![LineIssue::Duplicate(ProductId::parse("p1").unwrap())]);
    }

    #[test]
    fn test_decode_drops_zero_quantity_line_only() {
        let raw = encode(&[line("p1", 100, 0, 2), line("p2", 100, 1, 2)]).unwrap();
        let decoded = decode(&raw).unwrap();

        assert_eq!(decoded.items, vec![line("p2", 100, 1, 2)]);
        assert!(matches!(&decoded.issues[..], [LineIssue::ZeroQuantity(id)] if id.as_str() == "p1"));
    }

    #[test]
    fn test_decode_raises_stale_stock_bound() {
        // Restocked re-adds and zero-stock adds from older clients.
        let raw = r#"[
            {"_id":"a","name":"A","price":10,"quantity":2,"maxStock":5},
            {"_id":"b","name":"B","price":20,"quantity":5,"maxStock":3},
            {"_id":"c","name":"C","price":30,"quantity":1,"maxStock":0}
        ]"#;

        let decoded = decode(raw).unwrap();
        assert_eq!(decoded.items.len(), 3);
        assert_eq!(decoded.items[0].available_stock, 5);
        assert_eq!(decoded.items[1].available_stock, 5);
        assert_eq!(decoded.items[2].available_stock, 1);
        assert!(decoded.items.iter().all(CartLineItem::is_within_bounds));
        assert_eq!(
            decoded.issues[0],
            LineIssue::StockRaised {
                product_id: ProductId::parse("b").unwrap(),
                quantity: 5,
                available_stock: 3,
            }
        );
        assert_eq!(decoded.issues.len(), 2);
    }

    #[test]
    fn test_decode_drops_negative_price() {
        let raw = r#"[
            {"_id":"a","name":"A","price":-10,"quantity":1,"maxStock":5},
            {"_id":"b","name":"B","price":20,"quantity":1,"maxStock":3}
        ]"#;

        let decoded = decode(raw).unwrap();
        assert_eq!(decoded.items.len(), 1);
        assert_eq!(decoded.items[0].id.as_str(), "b");
        assert!(matches!(&decoded.issues[..], [LineIssue::NegativePrice(id)] if id.as_str() == "a"));
    }

    #[test]
    fn test_decode_drops_lines_that_would_overflow_the_total() {
        let raw = r#"[
            {"_id":"a","name":"A","price":50000000000000000000000000000,"quantity":1,"maxStock":1},
            {"_id":"b","name":"B","price":50000000000000000000000000000,"quantity":1,"maxStock":1},
            {"_id":"c","name":"C","price":20000000000000000000000000000,"quantity":1,"maxStock":5},
            {"_id":"d","name":"D","price":20,"quantity":1,"maxStock":3}
        ]"#;

        let decoded = decode(raw).unwrap();
        let ids: Vec<&str> = decoded.items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["a", "d"]);
        assert_eq!(decoded.issues.len(), 2);
        assert!(decoded.issues.iter().all(|issue| matches!(issue, LineIssue::TotalOverflow(_))));

        let total = decoded
            .items
            .iter()
            .try_fold(Price::ZERO, |acc, item| acc.checked_add(item.line_total()?));
        assert!(total.is_ok());
    }

    #[test]
    fn test_long_prices_survive_the_round_trip() {
        let item = CartLineItem {
            unit_price: Price::new(Decimal::new(1_234_567_890_123_456_789, 2)),
            ..line("p1", 0, 1, 1)
        };

        let decoded = decode(&encode(std::slice::from_ref(&item)).unwrap()).unwrap();
        assert_eq!(decoded.items, vec![item]);
    }

    fn arb_items() -> impl Strategy<Value = Vec<CartLineItem>> {
        let price = (0i64..=i64::MAX, 0u32..=6);
        prop::collection::btree_map("[a-z0-9]{1,8}", (price, 1u32..50, 0u32..50), 0..12).prop_map(
            |lines| {
                lines
                    .into_iter()
                    .map(|(id, ((mantissa, scale), stock, extra))| {
                        let quantity = (extra % stock) + 1;
                        CartLineItem {
                            unit_price: Price::new(Decimal::new(mantissa, scale)),
                            ..line(&id, 0, quantity, stock)
                        }
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn snapshot_roundtrip(items in arb_items()) {
            let raw = encode(&items).unwrap();
            let back = decode(&raw).unwrap();
            prop_assert!(back.issues.is_empty());
            prop_assert_eq!(back.items, items);
        }
    }
}
