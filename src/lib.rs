//! Stitchwork is the client core of a garment storefront.
//!
//! It covers two jobs:
//!
//! 1. **Cart**: a shared cart projection edited optimistically. Every quantity change or
//!    removal is applied locally first, then reconciled with the server; a failed request
//!    reverts exactly its own edit ([`CartMutator`]).
//! 2. **Customizer**: per-side (front/back) design documents made of text layers, one
//!    uploaded image and a placement container, rendered to PNG and submitted as a
//!    customization that is then added to the cart ([`CustomizerSession`]).
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Copy-on-write designs**: edits produce new [`DesignDocument`] values; a render holds a
//!   snapshot while editing continues.
//! - **Remote calls behind traits**: [`StorefrontApi`] and [`ImageSource`] are the only IO
//!   seams; [`HttpApi`] and [`DirImageSource`] are the shipped implementations.
//! - **Premultiplied RGBA8** inside the rasterizer; PNG output is straight alpha.
#![forbid(unsafe_code)]

mod api;
mod auth;
mod cart;
mod customize;
mod foundation;
mod raster;

pub use api::client::{
    AddToCartRequest, ApiError, ApiResult, CustomizationId, ImageSource, StorefrontApi,
};
pub use api::http::{HttpApi, join_url};
pub use api::local::{DirImageSource, normalize_rel_path};
pub use auth::{CHECKOUT_PATH, SIGN_IN_PATH, Session, checkout_route, sign_in_redirect};
pub use cart::cache::CartCache;
pub use cart::model::{
    CartItem, CartItemId, CartProduct, CartSummary, CurrencyInfo, CurrencySettings, Envelope,
    FREE_PRODUCT_PROMOTION, Promotion,
};
pub use cart::mutator::{CartMutator, MutationOutcome};
pub use cart::patch::{CartCommand, CartPatch};
pub use cart::pricing::{CartTotals, DEFAULT_CURRENCY_ICON, currency_icon, line_label};
pub use customize::design::{
    DEFAULT_TEXT_SIZE, DesignDocument, ImagePosition, LayerId, LayerIdGen, LayoutPatch,
    MAX_IMAGE_SIZE, MAX_TEXT_SIZE, MIN_IMAGE_SIZE, MIN_TEXT_SIZE, TextLayer, TextPatch,
};
pub use customize::options::{
    COLOR_OPTIONS, ColorOption, DEFAULT_FONT_FAMILY, DEFAULT_TEXT_COLOR, FONT_OPTIONS, FontOption,
};
pub use customize::payload::CustomizationPayload;
pub use customize::product::{PriceQuote, ProductCustomization, ProductDetails, ProductEnvelope};
pub use customize::session::{CustomizerSession, Download, SubmitGate, SubmitReceipt};
pub use foundation::config::{ApiConfig, PricingDefaults, RasterSettings, StorefrontConfig};
pub use foundation::core::{
    Affine, Point, Rect, Rgba8, Side, SideMap, SideSelection, Size, Vec2, clamp_percent,
    format_money,
};
pub use foundation::error::{StitchError, StitchResult};
pub use raster::cpu::CpuRasterizer;
pub use raster::decode::{
    PreparedImage, decode_data_url, decode_image, encode_data_url, encode_png,
    image_file_to_data_url, split_data_url,
};
pub use raster::fonts::{FontBook, FontFace};
pub use raster::scene::{PlacedImage, PlacedText, SceneLayer, SideScene, contain_rect};
pub use raster::{RasterImage, Rasterizer};
