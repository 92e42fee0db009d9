use std::sync::Arc;

use vello_cpu::kurbo::Shape as _;

use crate::{
    foundation::{
        core::{Point, Rect, Rgba8},
        error::{StitchError, StitchResult},
    },
    raster::{
        RasterImage, Rasterizer,
        decode::PreparedImage,
        fonts::FontBook,
        scene::{PlacedImage, PlacedText, SceneLayer, SideScene},
    },
};

/// [`Rasterizer`] drawing with `vello_cpu` and shaping text with `parley`.
pub struct CpuRasterizer {
    fonts: FontBook,
}

impl CpuRasterizer {
    pub fn new(fonts: FontBook) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        base: vello_cpu::kurbo::Affine,
        text: &PlacedText,
    ) -> StitchResult<()> {
        let layout = self.fonts.layout(
            &text.text,
            &text.font_family,
            text.size_px,
            text.color,
            Some(text.max_width as f32),
        )?;

        let w = f64::from(layout.width());
        let h = f64::from(layout.height());
        let origin = Point::new(text.center.x - w / 2.0, text.center.y - h / 2.0);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(base * vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(paint_color(brush));

                let mut x = run.offset();
                let y = run.baseline();
                let glyphs: Vec<vello_cpu::Glyph> = run
                    .glyphs()
                    .map(|g| {
                        let glyph = vello_cpu::Glyph {
                            id: g.id,
                            x: x + g.x,
                            y: y - g.y,
                        };
                        x += g.advance;
                        glyph
                    })
                    .collect();
                let shaped = run.run();
                ctx.glyph_run(shaped.font())
                    .font_size(shaped.font_size())
                    .fill_glyphs(glyphs.into_iter());
            }
        }
        Ok(())
    }
}

impl Rasterizer for CpuRasterizer {
    #[tracing::instrument(skip_all, fields(side = %scene.side, layers = scene.layers.len()))]
    fn rasterize(&mut self, scene: &SideScene) -> StitchResult<RasterImage> {
        let (width, height) = scene.output_size();
        let w16: u16 = width
            .try_into()
            .map_err(|_| StitchError::rasterization("output width exceeds u16"))?;
        let h16: u16 = height
            .try_into()
            .map_err(|_| StitchError::rasterization("output height exceeds u16"))?;

        let base = vello_cpu::kurbo::Affine::scale(scene.pixel_ratio);
        let mut ctx = vello_cpu::RenderContext::new(w16, h16);

        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(base);
        ctx.set_paint(paint_color(scene.background));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            scene.canvas.width,
            scene.canvas.height,
        ));

        draw_image(&mut ctx, base, &scene.base)?;

        ctx.set_transform(base);
        ctx.push_clip_layer(&rect_to_cpu(scene.container).to_path(0.1));
        for layer in &scene.layers {
            match layer {
                SceneLayer::Image(img) => draw_image(&mut ctx, base, img)?,
                SceneLayer::Text(text) => self.draw_text(&mut ctx, base, text)?,
            }
        }
        ctx.pop_layer();

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);

        Ok(RasterImage {
            width,
            height,
            rgba8_premul: pixmap.data_as_u8_slice().to_vec(),
        })
    }
}

fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    base: vello_cpu::kurbo::Affine,
    placed: &PlacedImage,
) -> StitchResult<()> {
    let img = &placed.image;
    let (iw, ih) = (f64::from(img.width), f64::from(img.height));
    if placed.rect.width() <= 0.0 || placed.rect.height() <= 0.0 {
        return Ok(());
    }

    let pixmap = image_premul_bytes_to_pixmap(img)?;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };

    let placement = vello_cpu::kurbo::Affine::translate((placed.rect.x0, placed.rect.y0))
        * vello_cpu::kurbo::Affine::scale_non_uniform(
            placed.rect.width() / iw,
            placed.rect.height() / ih,
        );
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(base * placement);
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
    Ok(())
}

fn image_premul_bytes_to_pixmap(img: &PreparedImage) -> StitchResult<vello_cpu::Pixmap> {
    let w: u16 = img
        .width
        .try_into()
        .map_err(|_| StitchError::rasterization("image width exceeds u16"))?;
    let h: u16 = img
        .height
        .try_into()
        .map_err(|_| StitchError::rasterization("image height exceeds u16"))?;
    if img.rgba8_premul.len() != img.width as usize * img.height as usize * 4 {
        return Err(StitchError::rasterization(
            "prepared image byte length mismatch",
        ));
    }

    let mut may_have_opacities = false;
    let pixels = img
        .rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn paint_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/cpu.rs"]
mod tests;
