use crate::foundation::lenient;

/// Cart line identifier assigned by the server.
pub type CartItemId = u64;

/// Promotion type the client interprets; every other type is carried opaquely.
pub const FREE_PRODUCT_PROMOTION: &str = "free_product";

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Product fields embedded in a cart line.
pub struct CartProduct {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Units in stock; the client treats it as an advisory ceiling.
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub qty: Option<u32>,
    #[serde(default, deserialize_with = "lenient::non_blank")]
    pub thumb_image: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// One line of the cached cart projection.
pub struct CartItem {
    pub id: CartItemId,
    #[serde(default)]
    pub product_id: u64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub extra_price: f64,
    #[serde(default, deserialize_with = "lenient::u32_or_zero")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_free_product: bool,
    #[serde(default, deserialize_with = "lenient::non_blank")]
    pub front_image: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_blank")]
    pub back_image: Option<String>,
    #[serde(default)]
    pub product: Option<CartProduct>,
}

impl CartItem {
    /// Base price plus customization surcharge for a single unit.
    pub fn unit_price(&self) -> f64 {
        self.price + self.extra_price
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price() * f64::from(self.quantity)
    }

    /// Known stock ceiling, `None` when the server did not embed product stock.
    pub fn available_stock(&self) -> Option<u32> {
        self.product.as_ref().and_then(|p| p.qty)
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Promotion attached to the cart; only the `type` tag is interpreted.
pub struct Promotion {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Promotion {
    pub fn is_free_product(&self) -> bool {
        self.kind == FREE_PRODUCT_PROMOTION
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Client-side mirror of the server cart. Derived values are recomputed, never stored.
pub struct CartSummary {
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub promotions: Vec<Promotion>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub sub_total: f64,
    #[serde(default, deserialize_with = "lenient::non_blank")]
    pub currency_icon: Option<String>,
}

impl CartSummary {
    pub fn item(&self, id: CartItemId) -> Option<&CartItem> {
        self.cart_items.iter().find(|i| i.id == id)
    }

    pub fn position(&self, id: CartItemId) -> Option<usize> {
        self.cart_items.iter().position(|i| i.id == id)
    }
}

/// `{ "data": ... }` wrapper used by the storefront API.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Store-wide currency settings.
pub struct CurrencyInfo {
    #[serde(default)]
    pub settings: CurrencySettings,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurrencySettings {
    #[serde(default, deserialize_with = "lenient::non_blank")]
    pub currency_icon: Option<String>,
}

#[cfg(test)]
#[path = "../../tests/unit/cart/model.rs"]
mod tests;
