use crate::foundation::{
    config::PricingDefaults,
    core::{Side, SideSelection},
    lenient,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Customization metadata the server attaches to a product.
pub struct ProductCustomization {
    #[serde(default, deserialize_with = "lenient::non_blank")]
    pub front_image: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_blank")]
    pub back_image: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub front_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub back_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub both_price: Option<f64>,
}

impl ProductCustomization {
    /// Relative path of the base garment image for `side`.
    pub fn base_image(&self, side: Side) -> Option<&str> {
        match side {
            Side::Front => self.front_image.as_deref(),
            Side::Back => self.back_image.as_deref(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProductDetails {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub customization: Option<ProductCustomization>,
}

impl ProductDetails {
    pub fn base_image(&self, side: Side) -> Option<&str> {
        self.customization.as_ref()?.base_image(side)
    }
}

/// `{ "product": ... }` wrapper returned by the product endpoint.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProductEnvelope {
    pub product: ProductDetails,
}

/// Prices attached to one customization submission.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceQuote {
    pub front_price: f64,
    pub back_price: f64,
    pub both_price: f64,
    /// Price sent with the add-to-cart request.
    pub cart_price: f64,
}

impl PriceQuote {
    /// Server prices win; `defaults` fill in only what the product omits.
    /// Uncustomized sides are quoted at zero.
    pub fn resolve(
        product: Option<&ProductCustomization>,
        defaults: &PricingDefaults,
        selection: SideSelection,
    ) -> Self {
        let price = |p: Option<f64>, fallback: f64| p.filter(|v| *v > 0.0).unwrap_or(fallback);
        let front = product.and_then(|p| p.front_price);
        let back = product.and_then(|p| p.back_price);
        let both = price(product.and_then(|p| p.both_price), defaults.both_price);

        let front_price = if selection.includes(Side::Front) {
            price(front, defaults.single_side_price)
        } else {
            0.0
        };
        let back_price = if selection.includes(Side::Back) {
            price(back, defaults.single_side_price)
        } else {
            0.0
        };

        match selection {
            SideSelection::Both => Self {
                front_price,
                back_price,
                both_price: both,
                cart_price: both,
            },
            SideSelection::Front | SideSelection::Back => Self {
                front_price,
                back_price,
                both_price: 0.0,
                cart_price: defaults.single_side_price,
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/customize/product.rs"]
mod tests;
