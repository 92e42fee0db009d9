use crate::{
    cart::model::{CartItem, CartItemId, CartSummary, CurrencyInfo},
    foundation::core::format_money,
};

/// Currency icon used when neither the store settings nor the cart carry one.
pub const DEFAULT_CURRENCY_ICON: &str = "$";

/// Display-only totals derived from a cart snapshot.
///
/// Recomputed on every read and never sent to the server; checkout totals are server-owned.
#[derive(Clone, Debug, PartialEq)]
pub struct CartTotals {
    pub has_free_product_promotion: bool,
    pub free_item: Option<CartItemId>,
    /// Value of the gift, shown struck through as a discount.
    pub free_item_original_price: f64,
    /// Sum of `(price + extra_price) * quantity` over non-free lines.
    pub displayed_total: f64,
}

impl CartTotals {
    pub fn derive(summary: &CartSummary) -> Self {
        let has_free_product_promotion = summary.promotions.iter().any(|p| p.is_free_product());
        let free_item = summary.cart_items.iter().find(|i| i.is_free_product);
        let displayed_total = summary
            .cart_items
            .iter()
            .filter(|i| !i.is_free_product)
            .map(CartItem::line_total)
            .sum();

        Self {
            has_free_product_promotion,
            free_item: free_item.map(|i| i.id),
            free_item_original_price: free_item.map(CartItem::line_total).unwrap_or(0.0),
            displayed_total,
        }
    }
}

/// Resolve the currency icon: store settings, then the cart summary, then `$`.
pub fn currency_icon<'a>(
    currency: Option<&'a CurrencyInfo>,
    summary: Option<&'a CartSummary>,
) -> &'a str {
    currency
        .and_then(|c| c.settings.currency_icon.as_deref())
        .or_else(|| summary.and_then(|s| s.currency_icon.as_deref()))
        .unwrap_or(DEFAULT_CURRENCY_ICON)
}

/// Price column text for one line: `FREE` for the gift, otherwise the formatted line total.
pub fn line_label(item: &CartItem, icon: &str) -> String {
    if item.is_free_product {
        "FREE".to_string()
    } else {
        format_money(icon, item.line_total())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cart/pricing.rs"]
mod tests;
