use crate::{
    customize::options::{DEFAULT_FONT_FAMILY, DEFAULT_TEXT_COLOR},
    foundation::core::clamp_percent,
};

pub const MIN_TEXT_SIZE: u32 = 12;
pub const MAX_TEXT_SIZE: u32 = 48;
pub const DEFAULT_TEXT_SIZE: u32 = 18;
pub const MIN_IMAGE_SIZE: f64 = 10.0;
pub const MAX_IMAGE_SIZE: f64 = 100.0;

/// Text layer identifier, unique within a customization session.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct LayerId(pub u64);

/// Monotonic id source shared by both sides of a session.
#[derive(Clone, Debug)]
pub struct LayerIdGen {
    next: u64,
}

impl Default for LayerIdGen {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl LayerIdGen {
    /// Continue after the largest id already present in `docs`.
    pub fn after<'a>(docs: impl IntoIterator<Item = &'a DesignDocument>) -> Self {
        let max = docs
            .into_iter()
            .flat_map(|d| d.texts.iter().map(|t| t.id.0))
            .max()
            .unwrap_or(0);
        Self { next: max + 1 }
    }

    pub fn next_id(&mut self) -> LayerId {
        let id = LayerId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Free-form text placed inside the design container.
pub struct TextLayer {
    pub id: LayerId,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_color")]
    pub title_color: String,
    #[serde(default = "default_text_size")]
    pub text_size: u32,
    #[serde(default = "default_font")]
    pub font_family: String,
    /// Horizontal center as a percentage of the container width.
    #[serde(default = "center")]
    pub x_axis: f64,
    /// Vertical center as a percentage of the container height.
    #[serde(default = "center")]
    pub y_axis: f64,
}

fn default_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

fn default_font() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_text_size() -> u32 {
    DEFAULT_TEXT_SIZE
}

fn center() -> f64 {
    50.0
}

impl TextLayer {
    /// Empty layer centered in the container with the default font and color.
    pub fn new(id: LayerId) -> Self {
        Self {
            id,
            title: String::new(),
            title_color: default_color(),
            text_size: DEFAULT_TEXT_SIZE,
            font_family: default_font(),
            x_axis: 50.0,
            y_axis: 50.0,
        }
    }

    /// Clamp coordinates and size into their valid ranges.
    pub fn normalized(mut self) -> Self {
        self.x_axis = clamp_percent(self.x_axis);
        self.y_axis = clamp_percent(self.y_axis);
        self.text_size = self.text_size.clamp(MIN_TEXT_SIZE, MAX_TEXT_SIZE);
        self
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Partial update for a [`TextLayer`]; `None` fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct TextPatch {
    pub title: Option<String>,
    pub title_color: Option<String>,
    pub text_size: Option<u32>,
    pub font_family: Option<String>,
    pub x_axis: Option<f64>,
    pub y_axis: Option<f64>,
}

impl TextPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    fn merge_into(&self, layer: &TextLayer) -> TextLayer {
        TextLayer {
            id: layer.id,
            title: self.title.clone().unwrap_or_else(|| layer.title.clone()),
            title_color: self
                .title_color
                .clone()
                .unwrap_or_else(|| layer.title_color.clone()),
            text_size: self.text_size.unwrap_or(layer.text_size),
            font_family: self
                .font_family
                .clone()
                .unwrap_or_else(|| layer.font_family.clone()),
            x_axis: self.x_axis.unwrap_or(layer.x_axis),
            y_axis: self.y_axis.unwrap_or(layer.y_axis),
        }
        .normalized()
    }
}

/// Paint order of the uploaded image relative to the text layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImagePosition {
    /// Image under the text.
    #[default]
    Below,
    /// Image over the text.
    Above,
}

impl ImagePosition {
    pub fn as_str(self) -> &'static str {
        match self {
            ImagePosition::Below => "below",
            ImagePosition::Above => "above",
        }
    }
}

/// Partial update for the container and image placement of a side.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LayoutPatch {
    pub image_position: Option<ImagePosition>,
    pub image_x_axis: Option<f64>,
    pub image_y_axis: Option<f64>,
    pub image_size: Option<f64>,
    pub container_x_axis: Option<f64>,
    pub container_y_axis: Option<f64>,
}

/// The design of one garment side.
///
/// Values are never edited in place by the session: every reducer returns a new document, so a
/// rasterization can hold a snapshot while the user keeps editing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DesignDocument {
    pub texts: Vec<TextLayer>,
    /// Uploaded sticker as a `data:` URL.
    pub uploaded_image: Option<String>,
    pub image_position: ImagePosition,
    pub image_x_axis: f64,
    pub image_y_axis: f64,
    /// Image width as a percentage of the container width.
    pub image_size: f64,
    /// Container center as a percentage of the canvas.
    pub container_x_axis: f64,
    pub container_y_axis: f64,
}

impl Default for DesignDocument {
    fn default() -> Self {
        Self {
            texts: Vec::new(),
            uploaded_image: None,
            image_position: ImagePosition::Below,
            image_x_axis: 50.0,
            image_y_axis: 30.0,
            image_size: 50.0,
            container_x_axis: 50.0,
            container_y_axis: 50.0,
        }
    }
}

impl DesignDocument {
    /// Fresh side with one empty text layer.
    pub fn new(first_layer: LayerId) -> Self {
        Self {
            texts: vec![TextLayer::new(first_layer)],
            ..Self::default()
        }
    }

    /// A side counts as customized with a non-blank title or an uploaded image.
    pub fn is_customized(&self) -> bool {
        self.texts.iter().any(TextLayer::has_title) || self.uploaded_image.is_some()
    }

    /// Layers that produce pixels (empty titles render nothing).
    pub fn visible_texts(&self) -> impl Iterator<Item = &TextLayer> {
        self.texts.iter().filter(|t| !t.title.is_empty())
    }

    pub fn text(&self, id: LayerId) -> Option<&TextLayer> {
        self.texts.iter().find(|t| t.id == id)
    }

    /// The remove control is offered only while more than one layer exists.
    pub fn can_remove_text(&self) -> bool {
        self.texts.len() > 1
    }

    pub fn with_text_added(&self, layer: TextLayer) -> Self {
        if self.text(layer.id).is_some() {
            return self.clone();
        }
        let mut texts = self.texts.clone();
        texts.push(layer.normalized());
        Self {
            texts,
            ..self.clone()
        }
    }

    /// Remove by id; never removes the last remaining layer.
    pub fn with_text_removed(&self, id: LayerId) -> Self {
        if !self.can_remove_text() {
            return self.clone();
        }
        Self {
            texts: self.texts.iter().filter(|t| t.id != id).cloned().collect(),
            ..self.clone()
        }
    }

    pub fn with_text_updated(&self, id: LayerId, patch: &TextPatch) -> Self {
        Self {
            texts: self
                .texts
                .iter()
                .map(|t| {
                    if t.id == id {
                        patch.merge_into(t)
                    } else {
                        t.clone()
                    }
                })
                .collect(),
            ..self.clone()
        }
    }

    pub fn with_uploaded_image(&self, data_url: Option<String>) -> Self {
        Self {
            uploaded_image: data_url.filter(|s| !s.trim().is_empty()),
            ..self.clone()
        }
    }

    pub fn with_layout(&self, patch: &LayoutPatch) -> Self {
        Self {
            image_position: patch.image_position.unwrap_or(self.image_position),
            image_x_axis: clamp_percent(patch.image_x_axis.unwrap_or(self.image_x_axis)),
            image_y_axis: clamp_percent(patch.image_y_axis.unwrap_or(self.image_y_axis)),
            image_size: clamp_image_size(patch.image_size.unwrap_or(self.image_size)),
            container_x_axis: clamp_percent(
                patch.container_x_axis.unwrap_or(self.container_x_axis),
            ),
            container_y_axis: clamp_percent(
                patch.container_y_axis.unwrap_or(self.container_y_axis),
            ),
            ..self.clone()
        }
    }
}

fn clamp_image_size(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(MIN_IMAGE_SIZE, MAX_IMAGE_SIZE)
    } else {
        50.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/customize/design.rs"]
mod tests;
