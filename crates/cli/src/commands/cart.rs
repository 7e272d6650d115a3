//! Cart editing commands.

use nexus_market_cart::{CartError, PricingConfig, ProductSnapshot};
use nexus_market_core::{PriceError, ProductId};
use tracing::info;

use super::Cart;

/// Add `quantity` units of `product`.
///
/// # Errors
///
/// Returns the `CartError` if the stock bound rejects the request.
pub fn add(cart: &mut Cart, product: &ProductSnapshot, quantity: u32) -> Result<(), CartError> {
    let new_quantity = cart.add_quantity(product, quantity)?;
    info!(
        product_id = %product.id,
        quantity = new_quantity,
        "Cart now holds {} unit(s) of {}",
        new_quantity,
        product.name
    );
    Ok(())
}

/// Remove the line for `id`.
pub fn remove(cart: &mut Cart, id: &ProductId) {
    if !cart.remove_from_cart(id) {
        info!(product_id = %id, "Product was not in the cart");
    }
}

/// Set the quantity of the line for `id`.
///
/// # Errors
///
/// Returns the `CartError` if the quantity is out of bounds.
pub fn update(cart: &mut Cart, id: &ProductId, quantity: u32) -> Result<(), CartError> {
    if cart.update_quantity(id, quantity)? {
        info!(product_id = %id, quantity, "Quantity updated");
    } else {
        info!(product_id = %id, "Product was not in the cart");
    }
    Ok(())
}

/// Empty the cart.
pub fn clear(cart: &mut Cart) {
    let lines = cart.len();
    cart.clear_cart();
    info!(lines, "Cart cleared");
}

/// List cart lines.
///
/// # Errors
///
/// Returns `PriceError` if a total does not fit.
pub fn show(cart: &Cart, pricing: &PricingConfig) -> Result<(), PriceError> {
    let dir = cart.storage().dir();
    if cart.is_empty() {
        info!(dir = %dir.display(), "Your cart is empty");
        return Ok(());
    }

    let currency = pricing.currency;
    info!(dir = %dir.display(), "Shopping Cart ({} items)", cart.len());
    for line in cart.items() {
        info!(
            "  {} x {} [{}] @ {} = {} (max {})",
            line.quantity,
            line.name,
            line.id,
            line.unit_price.display(currency),
            line.line_total()?.display(currency),
            line.available_stock
        );
    }
    info!(
        "Units: {}  Subtotal: {}",
        cart.cart_count(),
        cart.cart_total()?.display(currency)
    );
    Ok(())
}
