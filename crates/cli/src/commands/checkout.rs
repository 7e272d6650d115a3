//! Order summary and checkout payload commands.

use nexus_market_cart::{OrderRequest, OrderSummary, PricingConfig, ShippingDetails};
use nexus_market_core::PriceError;
use tracing::info;

use super::Cart;

/// Show subtotal, charges and total.
///
/// # Errors
///
/// Returns `PriceError` if a total does not fit.
pub fn summary(cart: &Cart, pricing: &PricingConfig) -> Result<(), PriceError> {
    let summary = OrderSummary::from_items(cart.items(), pricing)?;
    let currency = pricing.currency;

    info!("Order Summary");
    info!("=============");
    info!("Subtotal: {}", summary.subtotal.display(currency));
    info!("Shipping: {}", summary.shipping.display(currency));
    info!("Tax:      {}", summary.tax.display(currency));
    info!("Total:    {}", summary.total.display(currency));
    Ok(())
}

/// Print the order payload, optionally emptying the cart afterwards.
///
/// # Errors
///
/// Returns an error if the cart is empty, a shipping field is blank, or the
/// order total does not fit, or the payload cannot be serialized.
pub fn checkout(
    cart: &mut Cart,
    details: &ShippingDetails,
    pricing: &PricingConfig,
    clear: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let order = OrderRequest::from_cart(cart, details, pricing)?;
    let payload = serde_json::to_string_pretty(&order)?;

    info!(
        lines = order.products.len(),
        total = %order.total_amount.display(pricing.currency),
        "Order payload:\n{payload}"
    );

    if clear {
        cart.clear_cart();
        info!("Cart cleared after checkout");
    }
    Ok(())
}
