use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{
    api::client::{AddToCartRequest, ApiError, ApiResult, ImageSource, StorefrontApi},
    auth::Session,
    cart::model::{CartItemId, CartSummary, CurrencyInfo, Envelope},
    customize::{
        payload::CustomizationPayload,
        product::{ProductDetails, ProductEnvelope},
    },
    foundation::{config::ApiConfig, error::StitchResult},
};

/// [`StorefrontApi`] over HTTP+JSON with bearer-token auth.
#[derive(Clone, Debug)]
pub struct HttpApi {
    client: reqwest::Client,
    config: ApiConfig,
    session: Session,
}

impl HttpApi {
    pub fn new(config: ApiConfig, session: Session) -> StitchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| anyhow::anyhow!("build http client: {e}"))?;
        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, route: &str) -> String {
        join_url(&self.config.base_url, route)
    }

    fn request(&self, method: reqwest::Method, route: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(method, self.url(route))
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: server_message(&body),
            });
        }
        Ok(resp)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> ApiResult<T> {
        self.send(req)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Join a base URL and a route without doubling or dropping the `/`.
pub fn join_url(base: &str, route: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        route.trim_start_matches('/')
    )
}

/// Laravel error bodies carry a human-readable `message`.
fn server_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn with_param(template: &str, key: &str, value: &str) -> String {
    template.replace(&format!("{{{key}}}"), value)
}

#[async_trait]
impl StorefrontApi for HttpApi {
    #[tracing::instrument(skip(self))]
    async fn get_cart_summary(&self) -> ApiResult<CartSummary> {
        let env: Envelope<CartSummary> = self
            .send_json(self.request(reqwest::Method::GET, &self.config.cart_summary))
            .await?;
        Ok(env.data)
    }

    #[tracing::instrument(skip(self))]
    async fn update_cart_quantity(&self, id: CartItemId, quantity: u32) -> ApiResult<()> {
        let route = with_param(&self.config.update_cart_quantity, "id", &id.to_string());
        let req = self
            .request(reqwest::Method::POST, &route)
            .json(&serde_json::json!({ "quantity": quantity }));
        self.send(req).await.map(|_| ())
    }

    #[tracing::instrument(skip(self))]
    async fn remove_from_cart(&self, id: CartItemId) -> ApiResult<()> {
        let route = with_param(&self.config.remove_from_cart, "id", &id.to_string());
        self.send(self.request(reqwest::Method::DELETE, &route))
            .await
            .map(|_| ())
    }

    #[tracing::instrument(skip(self))]
    async fn get_product_details(&self, slug: &str) -> ApiResult<ProductDetails> {
        let route = with_param(&self.config.product_details, "slug", slug);
        let env: ProductEnvelope = self
            .send_json(self.request(reqwest::Method::GET, &route))
            .await?;
        Ok(env.product)
    }

    #[tracing::instrument(skip(self, payload), fields(side = ?payload.side))]
    async fn submit_customization(
        &self,
        payload: &CustomizationPayload,
    ) -> ApiResult<serde_json::Value> {
        let req = self
            .request(reqwest::Method::POST, &self.config.customize)
            .json(payload);
        self.send_json(req).await
    }

    #[tracing::instrument(skip(self))]
    async fn add_to_cart(&self, request: &AddToCartRequest) -> ApiResult<()> {
        let req = self
            .request(reqwest::Method::POST, &self.config.add_to_cart)
            .json(request);
        self.send(req).await.map(|_| ())
    }

    async fn get_currency(&self) -> ApiResult<CurrencyInfo> {
        self.send_json(self.request(reqwest::Method::GET, &self.config.currency))
            .await
    }
}

#[async_trait]
impl ImageSource for HttpApi {
    async fn fetch_image(&self, path: &str) -> ApiResult<Vec<u8>> {
        let resp = self.send(self.client.get(self.url(path))).await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
