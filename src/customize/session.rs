use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

use parking_lot::Mutex;

use crate::{
    api::client::{AddToCartRequest, CustomizationId, ImageSource, StorefrontApi},
    cart::{
        model::CartItemId,
        mutator::{CartMutator, MutationOutcome},
    },
    customize::{
        design::{DesignDocument, LayerId, LayerIdGen, LayoutPatch, TextLayer, TextPatch},
        payload::CustomizationPayload,
        product::{PriceQuote, ProductDetails},
    },
    foundation::{
        config::{PricingDefaults, RasterSettings, StorefrontConfig},
        core::{Side, SideMap, SideSelection},
        error::{StitchError, StitchResult},
    },
    raster::{
        RasterImage, Rasterizer,
        decode::{decode_data_url, decode_image, image_file_to_data_url},
        scene::SideScene,
    },
};

/// Busy flag shared by every submit attempt on one session.
#[derive(Clone, Debug, Default)]
pub struct SubmitGate {
    busy: Arc<AtomicBool>,
}

impl SubmitGate {
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn try_enter(&self) -> Option<SubmitTicket> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitTicket {
                busy: Arc::clone(&self.busy),
            })
    }
}

/// Holds the gate; releasing happens on drop so early returns and cancellation reopen it.
struct SubmitTicket {
    busy: Arc<AtomicBool>,
}

impl Drop for SubmitTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Result of a successful [`CustomizerSession::submit`].
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitReceipt {
    pub customization_id: CustomizationId,
    pub selection: SideSelection,
    pub quote: PriceQuote,
}

/// A rendered side ready to be saved.
#[derive(Clone, Debug, PartialEq)]
pub struct Download {
    pub file_name: String,
    pub png: Vec<u8>,
}

#[derive(Debug)]
struct SessionState {
    designs: SideMap<DesignDocument>,
    current_side: Side,
    ids: LayerIdGen,
    last_raster_error: Option<String>,
}

/// Editing state for customizing one product, plus the submit flow that turns it into a cart
/// line.
///
/// All methods take `&self`; edits are copy-on-write replacements of the per-side
/// [`DesignDocument`], so a render in progress keeps working from its own snapshot.
pub struct CustomizerSession {
    product: ProductDetails,
    state: Mutex<SessionState>,
    gate: SubmitGate,
    pricing: PricingDefaults,
    raster: RasterSettings,
    api: Arc<dyn StorefrontApi>,
    images: Arc<dyn ImageSource>,
    rasterizer: Mutex<Box<dyn Rasterizer>>,
    cart: Option<CartMutator>,
}

impl CustomizerSession {
    pub fn new(
        product: ProductDetails,
        api: Arc<dyn StorefrontApi>,
        images: Arc<dyn ImageSource>,
        rasterizer: Box<dyn Rasterizer>,
    ) -> Self {
        let mut ids = LayerIdGen::default();
        let designs = SideMap {
            front: DesignDocument::new(ids.next_id()),
            back: DesignDocument::new(ids.next_id()),
        };
        Self {
            product,
            state: Mutex::new(SessionState {
                designs,
                current_side: Side::Front,
                ids,
                last_raster_error: None,
            }),
            gate: SubmitGate::default(),
            pricing: PricingDefaults::default(),
            raster: RasterSettings::default(),
            api,
            images,
            rasterizer: Mutex::new(rasterizer),
            cart: None,
        }
    }

    /// Fetch product details by slug and start a session for it.
    #[tracing::instrument(skip(api, images, rasterizer))]
    pub async fn open(
        slug: &str,
        api: Arc<dyn StorefrontApi>,
        images: Arc<dyn ImageSource>,
        rasterizer: Box<dyn Rasterizer>,
    ) -> StitchResult<Self> {
        let product = api.get_product_details(slug).await?;
        Ok(Self::new(product, api, images, rasterizer))
    }

    /// Attach the shared cart so submissions invalidate it and redo flows can drop a line.
    pub fn with_cart(mut self, cart: CartMutator) -> Self {
        self.cart = Some(cart);
        self
    }

    /// Take price fallbacks and capture geometry from `config`.
    pub fn with_config(self, config: &StorefrontConfig) -> Self {
        self.with_pricing(config.pricing.clone())
            .with_raster_settings(config.raster.clone())
    }

    pub fn with_pricing(mut self, pricing: PricingDefaults) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_raster_settings(mut self, raster: RasterSettings) -> Self {
        self.raster = raster;
        self
    }

    /// Restore previously saved designs (e.g. a redo of an existing cart line).
    pub fn with_designs(self, designs: SideMap<DesignDocument>) -> Self {
        {
            let mut state = self.state.lock();
            state.ids = LayerIdGen::after([&designs.front, &designs.back]);
            state.designs = designs;
        }
        self
    }

    pub fn product(&self) -> &ProductDetails {
        &self.product
    }

    pub fn current_side(&self) -> Side {
        self.state.lock().current_side
    }

    pub fn design(&self, side: Side) -> DesignDocument {
        self.state.lock().designs.get(side).clone()
    }

    pub fn current_design(&self) -> DesignDocument {
        let state = self.state.lock();
        state.designs.get(state.current_side).clone()
    }

    pub fn designs(&self) -> SideMap<DesignDocument> {
        self.state.lock().designs.clone()
    }

    /// Message of the last failed render, cleared by [`Self::toggle_side`].
    pub fn last_raster_error(&self) -> Option<String> {
        self.state.lock().last_raster_error.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.gate.is_busy()
    }

    /// Append an empty text layer to the current side.
    pub fn add_text(&self) -> LayerId {
        self.add_text_on(self.current_side())
    }

    /// Append an empty text layer to `side`.
    pub fn add_text_on(&self, side: Side) -> LayerId {
        let mut state = self.state.lock();
        let id = state.ids.next_id();
        let doc = state.designs.get(side).with_text_added(TextLayer::new(id));
        *state.designs.get_mut(side) = doc;
        id
    }

    pub fn remove_text(&self, id: LayerId) {
        self.remove_text_on(self.current_side(), id);
    }

    pub fn remove_text_on(&self, side: Side, id: LayerId) {
        self.edit_on(side, |doc| doc.with_text_removed(id));
    }

    /// Merge `patch` into a layer of the current side; unknown ids are ignored.
    pub fn update_text(&self, id: LayerId, patch: &TextPatch) {
        self.update_text_on(self.current_side(), id, patch);
    }

    pub fn update_text_on(&self, side: Side, id: LayerId, patch: &TextPatch) {
        self.edit_on(side, |doc| doc.with_text_updated(id, patch));
    }

    pub fn set_uploaded_image(&self, data_url: Option<String>) {
        self.set_uploaded_image_on(self.current_side(), data_url);
    }

    pub fn set_uploaded_image_on(&self, side: Side, data_url: Option<String>) {
        self.edit_on(side, |doc| doc.with_uploaded_image(data_url));
    }

    pub fn remove_uploaded_image(&self) {
        self.set_uploaded_image(None);
    }

    /// Use an image file picked by the user as the current side's uploaded image.
    pub fn load_image_file(&self, bytes: &[u8]) -> StitchResult<()> {
        let url = image_file_to_data_url(bytes)?;
        self.set_uploaded_image(Some(url));
        Ok(())
    }

    pub fn update_layout(&self, patch: &LayoutPatch) {
        self.update_layout_on(self.current_side(), patch);
    }

    pub fn update_layout_on(&self, side: Side, patch: &LayoutPatch) {
        self.edit_on(side, |doc| doc.with_layout(patch));
    }

    /// Flip between front and back; returns the side now shown.
    pub fn toggle_side(&self) -> Side {
        let mut state = self.state.lock();
        state.current_side = state.current_side.other();
        state.last_raster_error = None;
        state.current_side
    }

    fn edit_on(&self, side: Side, f: impl FnOnce(&DesignDocument) -> DesignDocument) {
        let mut state = self.state.lock();
        let next = f(state.designs.get(side));
        *state.designs.get_mut(side) = next;
    }

    fn switch_side(&self, side: Side) -> Side {
        let mut state = self.state.lock();
        std::mem::replace(&mut state.current_side, side)
    }

    /// Render the current side.
    pub async fn preview(&self) -> StitchResult<RasterImage> {
        let side = self.current_side();
        let doc = self.design(side);
        self.render_side(side, &doc).await
    }

    /// Render the current side as `custom-<side>.png`.
    pub async fn download(&self) -> StitchResult<Download> {
        let side = self.current_side();
        let image = self.preview().await?;
        Ok(Download {
            file_name: format!("custom-{side}.png"),
            png: image.to_png()?,
        })
    }

    /// Re-customizing a cart line replaces it: drop the old line first.
    pub async fn begin_redo(&self, cart_item_id: CartItemId) -> StitchResult<MutationOutcome> {
        let cart = self
            .cart
            .as_ref()
            .ok_or_else(|| StitchError::validation("no cart attached to this session"))?;
        cart.remove_item(cart_item_id).await
    }

    /// Render `doc` as `side`.
    ///
    /// The session shows `side` while the base image loads and is drawn, then switches back to
    /// whatever side was shown before, whether rendering succeeded, failed or was dropped.
    #[tracing::instrument(skip(self, doc))]
    pub async fn render_side(&self, side: Side, doc: &DesignDocument) -> StitchResult<RasterImage> {
        let result = self.render_side_inner(side, doc).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "render failed");
            self.state.lock().last_raster_error = Some(e.to_string());
        }
        result
    }

    async fn render_side_inner(
        &self,
        side: Side,
        doc: &DesignDocument,
    ) -> StitchResult<RasterImage> {
        let base_path = self
            .product
            .base_image(side)
            .ok_or(StitchError::MissingBaseImage { side })?;

        let _restore = SideRestore {
            session: self,
            side: self.switch_side(side),
        };

        let bytes = self.images.fetch_image(base_path).await?;
        self.rasterize_fetched(side, doc, &bytes)
            .map_err(|e| match e {
                StitchError::Rasterization(_) => e,
                other => StitchError::rasterization(format!("{side}: {other}")),
            })
    }

    fn rasterize_fetched(
        &self,
        side: Side,
        doc: &DesignDocument,
        base_bytes: &[u8],
    ) -> StitchResult<RasterImage> {
        let base = decode_image(base_bytes)?;
        let uploaded = doc.uploaded_image.as_deref().map(decode_data_url).transpose()?;
        let scene = SideScene::compose(side, doc, base, uploaded, &self.raster)?;
        self.rasterizer.lock().rasterize(&scene)
    }

    /// Turn the designs into a customization and put it in the cart.
    ///
    /// Nothing is sent unless at least one side is customized and every customized side has a
    /// base image. The cart is only touched after the customization was created; a failed
    /// add-to-cart leaves that customization in place.
    #[tracing::instrument(skip(self), fields(product = self.product.id))]
    pub async fn submit(&self) -> StitchResult<SubmitReceipt> {
        let _ticket = self.gate.try_enter().ok_or(StitchError::SubmissionInFlight)?;

        let designs = self.designs();
        let selection = SideSelection::from_flags(
            designs.front.is_customized(),
            designs.back.is_customized(),
        )
        .ok_or(StitchError::NoCustomizationProvided)?;

        if let Some(side) = selection
            .sides()
            .find(|s| self.product.base_image(*s).is_none())
        {
            return Err(StitchError::MissingBaseImage { side });
        }

        let mut rasters: SideMap<Option<String>> = SideMap::default();
        for side in selection.sides() {
            let image = self.render_side(side, designs.get(side)).await?;
            *rasters.get_mut(side) = Some(image.to_data_url()?);
        }

        let quote = PriceQuote::resolve(
            self.product.customization.as_ref(),
            &self.pricing,
            selection,
        );
        let payload = CustomizationPayload::build(
            self.product.id,
            &designs,
            selection,
            &quote,
            &rasters,
            submission_nonce(),
        )?;

        let body = self.api.submit_customization(&payload).await?;
        let customization_id =
            CustomizationId::from_response(&body).ok_or(StitchError::CustomizationIdMissing)?;
        tracing::info!(id = %customization_id, ?selection, "customization created");

        self.api
            .add_to_cart(&AddToCartRequest {
                product_id: self.product.id,
                qty: 1,
                customization_id: customization_id.clone(),
                price: quote.cart_price,
            })
            .await?;
        if let Some(cart) = &self.cart {
            cart.cache().invalidate();
        }

        Ok(SubmitReceipt {
            customization_id,
            selection,
            quote,
        })
    }
}

struct SideRestore<'a> {
    session: &'a CustomizerSession,
    side: Side,
}

impl Drop for SideRestore<'_> {
    fn drop(&mut self) {
        self.session.switch_side(self.side);
    }
}

fn submission_nonce() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/customize/session.rs"]
mod tests;
