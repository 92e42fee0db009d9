pub(crate) mod cpu;
pub(crate) mod decode;
pub(crate) mod fonts;
pub(crate) mod scene;

use crate::{
    foundation::error::StitchResult,
    raster::{decode::unpremultiply_rgba8_in_place, scene::SideScene},
};

/// Turns a composed side into pixels.
///
/// Implementations need only honor the scene's layer semantics: percentage-anchored centered
/// placement, painter's order, clipping to the container.
pub trait Rasterizer: Send {
    fn rasterize(&mut self, scene: &SideScene) -> StitchResult<RasterImage>;
}

/// Rasterizer output: premultiplied RGBA8, row-major, no padding.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Vec<u8>,
}

impl RasterImage {
    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba8_premul.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn to_png(&self) -> StitchResult<Vec<u8>> {
        let mut straight = self.rgba8_premul.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        decode::encode_png(self.width, self.height, straight)
    }

    /// `data:image/png;base64,...`, the form the customize endpoint accepts.
    pub fn to_data_url(&self) -> StitchResult<String> {
        Ok(decode::encode_data_url("image/png", &self.to_png()?))
    }
}
