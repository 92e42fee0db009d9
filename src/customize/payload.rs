use crate::{
    customize::{design::DesignDocument, product::PriceQuote},
    foundation::{
        core::{Side, SideMap, SideSelection},
        error::StitchResult,
    },
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
struct TextWire<'a> {
    title: &'a str,
    x_position: String,
    y_position: String,
    size: String,
    color: &'a str,
    font_family: &'a str,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
struct ContainerWire {
    x_position: String,
    y_position: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
struct ImageWire {
    position: &'static str,
    x_position: String,
    y_position: String,
    size: String,
}

fn pct(v: f64) -> String {
    format!("{v}%")
}

/// Body of the customization request.
///
/// The nested placement fields are JSON documents encoded as strings, which is what the
/// server's form handling expects.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CustomizationPayload {
    pub product_id: u64,
    pub side: SideSelection,
    pub front_price: f64,
    pub back_price: f64,
    pub both_price: f64,
    /// PNG data URL, empty when the side is not customized.
    pub front_image: String,
    pub back_image: String,
    pub text_front: String,
    pub text_back: String,
    pub container_front: String,
    pub container_back: String,
    /// Image placement JSON, empty without an uploaded image.
    pub image_front: String,
    pub image_back: String,
    /// Millisecond timestamp that keeps the server from deduplicating repeat submissions.
    #[serde(rename = "_prevent_duplicate")]
    pub prevent_duplicate: u64,
}

impl CustomizationPayload {
    pub fn build(
        product_id: u64,
        designs: &SideMap<DesignDocument>,
        selection: SideSelection,
        quote: &PriceQuote,
        rasters: &SideMap<Option<String>>,
        prevent_duplicate: u64,
    ) -> StitchResult<Self> {
        Ok(Self {
            product_id,
            side: selection,
            front_price: quote.front_price,
            back_price: quote.back_price,
            both_price: quote.both_price,
            front_image: rasters.front.clone().unwrap_or_default(),
            back_image: rasters.back.clone().unwrap_or_default(),
            text_front: encode_texts(&designs.front)?,
            text_back: encode_texts(&designs.back)?,
            container_front: encode_container(&designs.front)?,
            container_back: encode_container(&designs.back)?,
            image_front: encode_image(&designs.front)?,
            image_back: encode_image(&designs.back)?,
            prevent_duplicate,
        })
    }

    /// Rasterized image for `side`, empty when the side was not rendered.
    pub fn image_for(&self, side: Side) -> &str {
        match side {
            Side::Front => &self.front_image,
            Side::Back => &self.back_image,
        }
    }
}

fn encode_texts(doc: &DesignDocument) -> StitchResult<String> {
    let texts: Vec<TextWire<'_>> = doc
        .texts
        .iter()
        .map(|t| TextWire {
            title: &t.title,
            x_position: pct(t.x_axis),
            y_position: pct(t.y_axis),
            size: format!("{}px", t.text_size),
            color: &t.title_color,
            font_family: &t.font_family,
        })
        .collect();
    Ok(serde_json::to_string(&texts)?)
}

fn encode_container(doc: &DesignDocument) -> StitchResult<String> {
    Ok(serde_json::to_string(&ContainerWire {
        x_position: pct(doc.container_x_axis),
        y_position: pct(doc.container_y_axis),
    })?)
}

fn encode_image(doc: &DesignDocument) -> StitchResult<String> {
    if doc.uploaded_image.is_none() {
        return Ok(String::new());
    }
    Ok(serde_json::to_string(&ImageWire {
        position: doc.image_position.as_str(),
        x_position: pct(doc.image_x_axis),
        y_position: pct(doc.image_y_axis),
        size: pct(doc.image_size),
    })?)
}

#[cfg(test)]
#[path = "../../tests/unit/customize/payload.rs"]
mod tests;
