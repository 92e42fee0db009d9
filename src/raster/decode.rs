use std::{io::Cursor, sync::Arc};

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{StitchError, StitchResult};

/// Decoded bitmap ready for compositing.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes, premultiplied alpha.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    pub fn aspect(&self) -> f64 {
        f64::from(self.height) / f64::from(self.width.max(1))
    }
}

const SVG_MIME: &str = "image/svg+xml";

/// Decode encoded image bytes (PNG, JPEG, WebP, GIF or SVG) into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> StitchResult<PreparedImage> {
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes);
    }

    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(StitchError::validation("image has no pixels"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Decode the payload of a `data:<mime>;base64,...` URL.
pub fn decode_data_url(url: &str) -> StitchResult<PreparedImage> {
    let (_, bytes) = split_data_url(url)?;
    decode_image(&bytes)
}

/// Returns the MIME type and raw bytes of a base64 data URL.
pub fn split_data_url(url: &str) -> StitchResult<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| StitchError::validation("expected a data: URL"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| StitchError::validation("data URL has no payload"))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| StitchError::validation("only base64 data URLs are supported"))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| StitchError::validation(format!("invalid base64 in data URL: {e}")))?;
    Ok((mime.to_string(), bytes))
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Turn a user-picked image file into a data URL, sniffing the MIME type from its content.
///
/// Bytes that are neither a known raster format nor an SVG document are rejected.
pub fn image_file_to_data_url(bytes: &[u8]) -> StitchResult<String> {
    if looks_like_svg(bytes) {
        return Ok(encode_data_url(SVG_MIME, bytes));
    }
    let format = image::guess_format(bytes)
        .map_err(|_| StitchError::validation("file is not a supported image"))?;
    Ok(encode_data_url(format.to_mime_type(), bytes))
}

/// Encode straight-alpha RGBA8 as PNG.
pub fn encode_png(width: u32, height: u32, rgba8: Vec<u8>) -> StitchResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(width, height, rgba8)
        .ok_or_else(|| StitchError::rasterization("pixel buffer does not match image size"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

fn rasterize_svg(bytes: &[u8]) -> StitchResult<PreparedImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    let width = size.width().ceil().max(1.0) as u32;
    let height = size.height().ceil().max(1.0) as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| StitchError::rasterization("failed to allocate svg pixmap"))?;

    let xform = resvg::tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/decode.rs"]
mod tests;
