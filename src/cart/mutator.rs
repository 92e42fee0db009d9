use std::{future::Future, sync::Arc};

use crate::{
    api::client::{ApiError, ApiResult, StorefrontApi},
    auth::{SIGN_IN_PATH, Session},
    cart::{
        cache::CartCache,
        model::{CartItem, CartItemId, CartSummary},
        patch::{CartCommand, CartPatch},
        pricing::{CartTotals, currency_icon},
    },
    foundation::error::{StitchError, StitchResult},
};

/// What a cart intent did to the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The optimistic edit was applied and the server accepted it.
    Applied,
    /// Nothing to do (same quantity, or a decrement at the floor). No request was sent.
    Unchanged,
}

/// Applies cart intents optimistically to the shared [`CartCache`] and reconciles with the
/// server.
///
/// Each intent captures exactly one inverse patch. A failed request reverts only its own patch;
/// two in-flight edits of the same line that both fail revert to their own snapshots.
#[derive(Clone)]
pub struct CartMutator {
    api: Arc<dyn StorefrontApi>,
    cache: CartCache,
    session: Session,
}

impl CartMutator {
    pub fn new(api: Arc<dyn StorefrontApi>, cache: CartCache, session: Session) -> Self {
        Self {
            api,
            cache,
            session,
        }
    }

    pub fn cache(&self) -> &CartCache {
        &self.cache
    }

    /// Display totals for the current snapshot.
    pub fn totals(&self) -> Option<CartTotals> {
        self.cache.snapshot().as_ref().map(CartTotals::derive)
    }

    /// Icon to prefix prices with: store currency settings, then the cached summary, then `$`.
    ///
    /// A failed currency lookup is not an error; the chain just continues.
    pub async fn currency_icon(&self) -> String {
        let currency = match self.api.get_currency().await {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::debug!(error = %e, "currency settings unavailable");
                None
            }
        };
        let summary = self.cache.snapshot();
        currency_icon(currency.as_ref(), summary.as_ref()).to_string()
    }

    /// Fetch the summary and seed the cache.
    ///
    /// A 401 clears the session and the cached cart and yields [`StitchError::SessionExpired`].
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> StitchResult<CartSummary> {
        match self.api.get_cart_summary().await {
            Ok(summary) => {
                self.cache.replace(summary.clone());
                Ok(summary)
            }
            Err(ApiError::Unauthorized) => {
                tracing::warn!("cart summary rejected as unauthenticated, clearing session");
                self.session.clear();
                self.cache.clear();
                Err(StitchError::SessionExpired {
                    redirect: SIGN_IN_PATH.to_string(),
                })
            }
            Err(e) => {
                let msg = match &e {
                    ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
                    _ => format!("Failed to load cart: {e}"),
                };
                Err(StitchError::Network(msg))
            }
        }
    }

    /// Cached summary, refetched when missing or invalidated.
    pub async fn ensure_fresh(&self) -> StitchResult<CartSummary> {
        match self.cache.snapshot() {
            Some(summary) if !self.cache.needs_refresh() => Ok(summary),
            _ => self.refresh().await,
        }
    }

    /// Set a line's quantity.
    ///
    /// Rejected locally (no edit, no request) when `new_quantity` is not a positive integer, when
    /// the line is the complimentary gift, or when it exceeds known stock
    /// ([`StitchError::StockExceeded`], a warning).
    #[tracing::instrument(skip(self))]
    pub async fn change_quantity(
        &self,
        item_id: CartItemId,
        new_quantity: i64,
    ) -> StitchResult<MutationOutcome> {
        let quantity = u32::try_from(new_quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or_else(|| {
                StitchError::validation(format!(
                    "quantity must be a positive integer, got {new_quantity}"
                ))
            })?;

        let item = self.editable_item(item_id)?;
        if let Some(stock) = item.available_stock()
            && quantity > stock
        {
            return Err(StitchError::StockExceeded { available: stock });
        }
        if quantity == item.quantity {
            return Ok(MutationOutcome::Unchanged);
        }

        let command = self.cache.apply(CartPatch::SetQuantity { item_id, quantity });
        tracing::debug!(from = item.quantity, to = quantity, "optimistic quantity change");
        self.commit(command, self.api.update_cart_quantity(item_id, quantity))
            .await
    }

    /// The `+` control: one more unit unless stock is already reached.
    pub async fn increment(&self, item_id: CartItemId) -> StitchResult<MutationOutcome> {
        let item = self.editable_item(item_id)?;
        if let Some(stock) = item.available_stock()
            && item.quantity >= stock
        {
            return Err(StitchError::StockExceeded { available: stock });
        }
        self.change_quantity(item_id, i64::from(item.quantity) + 1)
            .await
    }

    /// The `-` control: one fewer unit; at quantity 1 this is a no-op, never a removal.
    pub async fn decrement(&self, item_id: CartItemId) -> StitchResult<MutationOutcome> {
        let item = self.editable_item(item_id)?;
        if item.quantity <= 1 {
            return Ok(MutationOutcome::Unchanged);
        }
        self.change_quantity(item_id, i64::from(item.quantity) - 1)
            .await
    }

    /// Remove a line. The complimentary gift cannot be removed.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, item_id: CartItemId) -> StitchResult<MutationOutcome> {
        self.editable_item(item_id)?;
        let command = self.cache.apply(CartPatch::Remove { item_id });
        tracing::debug!("optimistic removal");
        self.commit(command, self.api.remove_from_cart(item_id))
            .await
    }

    fn editable_item(&self, item_id: CartItemId) -> StitchResult<CartItem> {
        let item = self
            .cache
            .item(item_id)
            .ok_or_else(|| StitchError::validation(format!("unknown cart item {item_id}")))?;
        if item.is_free_product {
            return Err(StitchError::validation(
                "complimentary gift cannot be modified or removed",
            ));
        }
        Ok(item)
    }

    async fn commit(
        &self,
        command: CartCommand,
        request: impl Future<Output = ApiResult<()>>,
    ) -> StitchResult<MutationOutcome> {
        match request.await {
            Ok(()) => Ok(MutationOutcome::Applied),
            Err(e) => {
                let reverted = self.cache.revert(&command);
                tracing::warn!(
                    error = %e,
                    reverted,
                    item = command.forward.item_id(),
                    "cart mutation failed"
                );
                Err(StitchError::CartMutationFailed {
                    reason: e.user_message(),
                })
            }
        }
    }
}
