use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::{
    core::Rgba8,
    error::{StitchError, StitchResult},
};

/// Runtime configuration for the storefront client core.
///
/// Every section has defaults matching the storefront's shipped behavior, so an empty JSON
/// object is a valid config.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    pub api: ApiConfig,
    pub pricing: PricingDefaults,
    pub raster: RasterSettings,
    /// Directory scanned for `.ttf`/`.otf` files used by text layers.
    pub font_dir: Option<PathBuf>,
}

/// Remote API location and route templates (`{id}` / `{slug}` are substituted).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub cart_summary: String,
    pub update_cart_quantity: String,
    pub remove_from_cart: String,
    pub product_details: String,
    pub customize: String,
    pub add_to_cart: String,
    pub currency: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            cart_summary: "/api/cart-summery".to_string(),
            update_cart_quantity: "/api/cart/update/{id}".to_string(),
            remove_from_cart: "/api/cart/remove/{id}".to_string(),
            product_details: "/api/product/{slug}".to_string(),
            customize: "/api/product-customize".to_string(),
            add_to_cart: "/api/add-to-cart".to_string(),
            currency: "/api/currency".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Client-side price fallbacks used only when the product omits customization prices.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PricingDefaults {
    /// Flat price charged when exactly one side is customized.
    pub single_side_price: f64,
    /// Price charged when both sides are customized.
    pub both_price: f64,
}

impl Default for PricingDefaults {
    fn default() -> Self {
        Self {
            single_side_price: 4.0,
            both_price: 8.0,
        }
    }
}

/// Geometry of the capture surface, in CSS pixels scaled by `pixel_ratio`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RasterSettings {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub pixel_ratio: f64,
    pub background: Rgba8,
    /// Side length of the square design container.
    pub container_px: f64,
    /// Upper bound on the rendered width of the uploaded image.
    pub image_max_width_px: f64,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            canvas_width: 700,
            canvas_height: 600,
            pixel_ratio: 2.0,
            background: Rgba8::WHITE,
            container_px: 240.0,
            image_max_width_px: 200.0,
        }
    }
}

impl RasterSettings {
    pub fn validate(&self) -> StitchResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(StitchError::validation("raster canvas must be non-empty"));
        }
        if !self.pixel_ratio.is_finite() || self.pixel_ratio <= 0.0 {
            return Err(StitchError::validation(
                "raster pixel_ratio must be finite and > 0",
            ));
        }
        let (w, h) = self.output_size();
        if w > u32::from(u16::MAX) || h > u32::from(u16::MAX) {
            return Err(StitchError::validation(format!(
                "raster output {w}x{h} exceeds {max}x{max}",
                max = u16::MAX
            )));
        }
        if self.container_px <= 0.0 || self.image_max_width_px <= 0.0 {
            return Err(StitchError::validation(
                "container and image sizes must be > 0",
            ));
        }
        Ok(())
    }

    /// Device pixel size of the output image.
    pub fn output_size(&self) -> (u32, u32) {
        let w = (f64::from(self.canvas_width) * self.pixel_ratio).round().max(1.0) as u32;
        let h = (f64::from(self.canvas_height) * self.pixel_ratio).round().max(1.0) as u32;
        (w, h)
    }
}

impl StorefrontConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> StitchResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)?;
        cfg.raster.validate()?;
        Ok(cfg)
    }

    /// Apply `STITCHWORK_*` environment overrides on top of the loaded values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("STITCHWORK_API_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(dir) = lookup("STITCHWORK_FONT_DIR").filter(|v| !v.trim().is_empty()) {
            self.font_dir = Some(PathBuf::from(dir));
        }
        if let Some(ratio) = lookup("STITCHWORK_PIXEL_RATIO")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|r| r.is_finite() && *r > 0.0)
        {
            self.raster.pixel_ratio = ratio;
        }
        if let Some(secs) = lookup("STITCHWORK_API_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&n| n > 0)
        {
            self.api.timeout_secs = secs;
        }
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
