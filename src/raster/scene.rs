use crate::{
    customize::design::{DesignDocument, ImagePosition},
    foundation::{
        config::RasterSettings,
        core::{Point, Rect, Rgba8, Side, Size},
        error::StitchResult,
    },
    raster::decode::PreparedImage,
};

/// An image with its destination rectangle in CSS pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedImage {
    pub image: PreparedImage,
    pub rect: Rect,
}

/// A text layer resolved to concrete style and anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub font_family: String,
    pub size_px: f32,
    pub color: Rgba8,
    /// Center of the laid-out text block.
    pub center: Point,
    pub max_width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneLayer {
    Image(PlacedImage),
    Text(PlacedText),
}

/// Everything needed to draw one side, in CSS pixels.
///
/// `layers` are in painter's order and are clipped to `container`.
#[derive(Clone, Debug, PartialEq)]
pub struct SideScene {
    pub side: Side,
    pub canvas: Size,
    pub pixel_ratio: f64,
    pub background: Rgba8,
    pub base: PlacedImage,
    pub container: Rect,
    pub layers: Vec<SceneLayer>,
}

impl SideScene {
    /// Lay out `doc` over its base garment photo.
    ///
    /// The container is a square centered at its percentage position on the canvas. Text and
    /// the uploaded image are centered at their percentage positions inside the container.
    pub fn compose(
        side: Side,
        doc: &DesignDocument,
        base: PreparedImage,
        uploaded: Option<PreparedImage>,
        settings: &RasterSettings,
    ) -> StitchResult<Self> {
        settings.validate()?;
        let canvas = Size::new(
            f64::from(settings.canvas_width),
            f64::from(settings.canvas_height),
        );
        let canvas_rect = Rect::from_origin_size(Point::ORIGIN, canvas);
        let base_rect = contain_rect(&base, canvas_rect);

        let container = Rect::from_center_size(
            percent_of(canvas_rect, doc.container_x_axis, doc.container_y_axis),
            Size::new(settings.container_px, settings.container_px),
        );

        let image_layer = uploaded.map(|image| {
            let width = (doc.image_size / 100.0 * container.width())
                .min(settings.image_max_width_px)
                .max(1.0);
            let size = Size::new(width, width * image.aspect());
            let rect = Rect::from_center_size(
                percent_of(container, doc.image_x_axis, doc.image_y_axis),
                size,
            );
            SceneLayer::Image(PlacedImage { image, rect })
        });

        let texts = doc.visible_texts().map(|t| {
            let color = Rgba8::parse_css(&t.title_color).unwrap_or_else(|| {
                tracing::debug!(color = %t.title_color, "unknown text color, using black");
                Rgba8::BLACK
            });
            SceneLayer::Text(PlacedText {
                text: t.title.clone(),
                font_family: t.font_family.clone(),
                size_px: t.text_size as f32,
                color,
                center: percent_of(container, t.x_axis, t.y_axis),
                max_width: container.width(),
            })
        });

        let layers: Vec<SceneLayer> = match doc.image_position {
            ImagePosition::Below => image_layer.into_iter().chain(texts).collect(),
            ImagePosition::Above => texts.chain(image_layer).collect(),
        };

        Ok(Self {
            side,
            canvas,
            pixel_ratio: settings.pixel_ratio,
            background: settings.background,
            base: PlacedImage {
                image: base,
                rect: base_rect,
            },
            container,
            layers,
        })
    }

    /// Output size in device pixels.
    pub fn output_size(&self) -> (u32, u32) {
        (
            (self.canvas.width * self.pixel_ratio).round().max(1.0) as u32,
            (self.canvas.height * self.pixel_ratio).round().max(1.0) as u32,
        )
    }
}

/// Largest rectangle with the image's aspect ratio that fits `bounds`, centered.
pub fn contain_rect(image: &PreparedImage, bounds: Rect) -> Rect {
    let iw = f64::from(image.width.max(1));
    let ih = f64::from(image.height.max(1));
    let scale = (bounds.width() / iw).min(bounds.height() / ih);
    Rect::from_center_size(bounds.center(), Size::new(iw * scale, ih * scale))
}

fn percent_of(rect: Rect, x_pct: f64, y_pct: f64) -> Point {
    Point::new(
        rect.x0 + rect.width() * x_pct / 100.0,
        rect.y0 + rect.height() * y_pct / 100.0,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/raster/scene.rs"]
mod tests;
