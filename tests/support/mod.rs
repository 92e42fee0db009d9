#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    io::Cursor,
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use stitchwork::{
    AddToCartRequest, ApiError, ApiResult, CartCache, CartItem, CartItemId, CartProduct,
    CartSummary, CurrencyInfo, CustomizationPayload, ImageSource, ProductDetails, Promotion,
    StorefrontApi,
};

/// One recorded remote call.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CartSummary,
    UpdateQuantity { id: CartItemId, quantity: u32 },
    Remove { id: CartItemId },
    Product { slug: String },
    Customize(Box<CustomizationPayload>),
    AddToCart(AddToCartRequest),
    Currency,
    FetchImage(String),
}

/// Scripted reply for a cart mutation.
#[derive(Clone, Debug)]
pub struct Reply {
    pub delay: Duration,
    pub result: ApiResult<()>,
}

impl Reply {
    pub fn ok() -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(()),
        }
    }

    pub fn fail(message: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(ApiError::Status {
                status: 422,
                message: message.to_string(),
            }),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// In-memory storefront. Records every call, replays scripted results and, when a cache is
/// attached, snapshots it at the moment each cart mutation reaches the "server".
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    summary: Mutex<ApiResult<CartSummary>>,
    mutation_replies: Mutex<VecDeque<Reply>>,
    product: Mutex<Option<ProductDetails>>,
    customize_body: Mutex<ApiResult<serde_json::Value>>,
    add_to_cart: Mutex<ApiResult<()>>,
    currency: Mutex<ApiResult<CurrencyInfo>>,
    images: Mutex<HashMap<String, Vec<u8>>>,
    image_delay: Mutex<Duration>,
    probe: Mutex<Option<CartCache>>,
    probes: Mutex<Vec<Option<CartSummary>>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            summary: Mutex::new(Ok(CartSummary::default())),
            mutation_replies: Mutex::new(VecDeque::new()),
            product: Mutex::new(None),
            customize_body: Mutex::new(Ok(serde_json::json!({"data": {"customization_id": 77}}))),
            add_to_cart: Mutex::new(Ok(())),
            currency: Mutex::new(Err(ApiError::Transport("no currency configured".to_string()))),
            images: Mutex::new(HashMap::new()),
            image_delay: Mutex::new(Duration::ZERO),
            probe: Mutex::new(None),
            probes: Mutex::new(Vec::new()),
        }
    }
}

impl FakeApi {
    pub fn with_summary(summary: CartSummary) -> Self {
        let api = Self::default();
        *api.summary.lock() = Ok(summary);
        api
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn network_calls(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| !matches!(c, Call::FetchImage(_)))
            .count()
    }

    pub fn set_summary(&self, summary: ApiResult<CartSummary>) {
        *self.summary.lock() = summary;
    }

    pub fn script(&self, reply: Reply) {
        self.mutation_replies.lock().push_back(reply);
    }

    pub fn set_product(&self, product: ProductDetails) {
        *self.product.lock() = Some(product);
    }

    pub fn set_customize_body(&self, body: ApiResult<serde_json::Value>) {
        *self.customize_body.lock() = body;
    }

    pub fn set_add_to_cart(&self, result: ApiResult<()>) {
        *self.add_to_cart.lock() = result;
    }

    pub fn set_currency(&self, currency: ApiResult<CurrencyInfo>) {
        *self.currency.lock() = currency;
    }

    pub fn put_image(&self, path: &str, bytes: Vec<u8>) {
        self.images.lock().insert(path.to_string(), bytes);
    }

    pub fn set_image_delay(&self, delay: Duration) {
        *self.image_delay.lock() = delay;
    }

    pub fn probe(&self, cache: CartCache) {
        *self.probe.lock() = Some(cache);
    }

    /// Cache snapshots taken as each mutation request arrived.
    pub fn probes(&self) -> Vec<Option<CartSummary>> {
        self.probes.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    async fn mutation(&self, call: Call) -> ApiResult<()> {
        self.record(call);
        let snapshot = self.probe.lock().as_ref().map(CartCache::snapshot);
        if let Some(snapshot) = snapshot {
            self.probes.lock().push(snapshot);
        }
        let reply = self.mutation_replies.lock().pop_front().unwrap_or_else(Reply::ok);
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result
    }
}

#[async_trait]
impl StorefrontApi for FakeApi {
    async fn get_cart_summary(&self) -> ApiResult<CartSummary> {
        self.record(Call::CartSummary);
        self.summary.lock().clone()
    }

    async fn update_cart_quantity(&self, id: CartItemId, quantity: u32) -> ApiResult<()> {
        self.mutation(Call::UpdateQuantity { id, quantity }).await
    }

    async fn remove_from_cart(&self, id: CartItemId) -> ApiResult<()> {
        self.mutation(Call::Remove { id }).await
    }

    async fn get_product_details(&self, slug: &str) -> ApiResult<ProductDetails> {
        self.record(Call::Product {
            slug: slug.to_string(),
        });
        self.product.lock().clone().ok_or(ApiError::Status {
            status: 404,
            message: "Product not found".to_string(),
        })
    }

    async fn submit_customization(
        &self,
        payload: &CustomizationPayload,
    ) -> ApiResult<serde_json::Value> {
        self.record(Call::Customize(Box::new(payload.clone())));
        self.customize_body.lock().clone()
    }

    async fn add_to_cart(&self, request: &AddToCartRequest) -> ApiResult<()> {
        self.record(Call::AddToCart(request.clone()));
        self.add_to_cart.lock().clone()
    }

    async fn get_currency(&self) -> ApiResult<CurrencyInfo> {
        self.record(Call::Currency);
        self.currency.lock().clone()
    }
}

#[async_trait]
impl ImageSource for FakeApi {
    async fn fetch_image(&self, path: &str) -> ApiResult<Vec<u8>> {
        self.record(Call::FetchImage(path.to_string()));
        let delay = *self.image_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.images
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: format!("no image at {path}"),
            })
    }
}

pub fn png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

pub fn item(id: CartItemId, price: f64, quantity: u32, stock: Option<u32>) -> CartItem {
    CartItem {
        id,
        product_id: id * 10,
        price,
        quantity,
        product: Some(CartProduct {
            id: id * 10,
            name: format!("Product {id}"),
            qty: stock,
            thumb_image: None,
        }),
        ..CartItem::default()
    }
}

pub fn gift(id: CartItemId, price: f64) -> CartItem {
    CartItem {
        is_free_product: true,
        ..item(id, price, 1, None)
    }
}

pub fn free_product_promotion() -> Promotion {
    Promotion {
        kind: "free_product".to_string(),
        ..Promotion::default()
    }
}

pub fn summary(items: Vec<CartItem>) -> CartSummary {
    CartSummary {
        cart_items: items,
        ..CartSummary::default()
    }
}

pub fn quantities(cache: &CartCache) -> Vec<(CartItemId, u32)> {
    cache
        .snapshot()
        .map(|s| s.cart_items.iter().map(|i| (i.id, i.quantity)).collect())
        .unwrap_or_default()
}

pub fn dejavu_fonts() -> stitchwork::FontBook {
    let mut fonts = stitchwork::FontBook::new();
    fonts
        .register(std::fs::read("tests/data/fonts/DejaVuSans.ttf").unwrap(), None)
        .unwrap();
    fonts
}
