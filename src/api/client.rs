use async_trait::async_trait;

use crate::{
    cart::model::{CartItemId, CartSummary, CurrencyInfo},
    customize::{payload::CustomizationPayload, product::ProductDetails},
    foundation::error::StitchError,
};

/// Failure of a remote call, before it is mapped into the crate taxonomy.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// HTTP 401.
    #[error("unauthenticated")]
    Unauthorized,

    /// Non-success status; `message` is the server's `message` field when it sent one.
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection, timeout or TLS failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body did not have the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text suitable for a user-facing notice.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<ApiError> for StitchError {
    fn from(e: ApiError) -> Self {
        StitchError::Network(e.user_message())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Server id of a created customization, kept in the JSON form the server used.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct CustomizationId(pub serde_json::Value);

impl CustomizationId {
    /// Read `data.customization_id`, falling back to a top-level `customization_id`.
    /// Null, empty, zero and `false` count as absent.
    pub fn from_response(body: &serde_json::Value) -> Option<Self> {
        [
            body.get("data").and_then(|d| d.get("customization_id")),
            body.get("customization_id"),
        ]
        .into_iter()
        .flatten()
        .find(|v| is_present(v))
        .cloned()
        .map(Self)
    }
}

fn is_present(v: &serde_json::Value) -> bool {
    match v {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

impl std::fmt::Display for CustomizationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AddToCartRequest {
    pub product_id: u64,
    pub qty: u32,
    pub customization_id: CustomizationId,
    pub price: f64,
}

/// Remote storefront operations the client core consumes.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    async fn get_cart_summary(&self) -> ApiResult<CartSummary>;

    async fn update_cart_quantity(&self, id: CartItemId, quantity: u32) -> ApiResult<()>;

    async fn remove_from_cart(&self, id: CartItemId) -> ApiResult<()>;

    async fn get_product_details(&self, slug: &str) -> ApiResult<ProductDetails>;

    /// Returns the raw response body; see [`CustomizationId::from_response`].
    async fn submit_customization(
        &self,
        payload: &CustomizationPayload,
    ) -> ApiResult<serde_json::Value>;

    async fn add_to_cart(&self, request: &AddToCartRequest) -> ApiResult<()>;

    async fn get_currency(&self) -> ApiResult<CurrencyInfo>;
}

/// Fetches encoded image bytes (base garment photos) by storage-relative path.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch_image(&self, path: &str) -> ApiResult<Vec<u8>>;
}

#[cfg(test)]
#[path = "../../tests/unit/api/client.rs"]
mod tests;
