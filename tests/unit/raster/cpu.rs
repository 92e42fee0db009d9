use super::*;
use crate::{
    customize::design::{DesignDocument, ImagePosition, LayerId, LayoutPatch, TextPatch},
    foundation::{config::RasterSettings, core::Side},
};

fn solid(width: u32, height: u32, rgba: Rgba8) -> PreparedImage {
    let px = rgba.to_premul();
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(px.repeat((width * height) as usize)),
    }
}

fn small_settings() -> RasterSettings {
    RasterSettings {
        canvas_width: 100,
        canvas_height: 80,
        pixel_ratio: 1.0,
        container_px: 40.0,
        image_max_width_px: 40.0,
        ..RasterSettings::default()
    }
}

fn dejavu_rasterizer() -> CpuRasterizer {
    let mut fonts = FontBook::new();
    fonts
        .register(std::fs::read("tests/data/fonts/DejaVuSans.ttf").unwrap(), None)
        .unwrap();
    CpuRasterizer::new(fonts)
}

#[test]
fn background_and_contained_base() {
    let settings = small_settings();
    let doc = DesignDocument::new(LayerId(1));
    // 1:1 base on a 100x80 canvas -> 80x80 centered, white bars left and right.
    let base = solid(2, 2, Rgba8::opaque(0, 0, 255));
    let scene = SideScene::compose(Side::Front, &doc, base, None, &settings).unwrap();

    let out = CpuRasterizer::new(FontBook::new()).rasterize(&scene).unwrap();
    assert_eq!((out.width, out.height), (100, 80));
    assert_eq!(out.pixel(2, 40), Some([255, 255, 255, 255]));
    assert_eq!(out.pixel(50, 40), Some([0, 0, 255, 255]));
    assert_eq!(out.pixel(97, 40), Some([255, 255, 255, 255]));
}

#[test]
fn pixel_ratio_scales_output() {
    let settings = RasterSettings {
        pixel_ratio: 2.0,
        ..small_settings()
    };
    let doc = DesignDocument::new(LayerId(1));
    let scene =
        SideScene::compose(Side::Back, &doc, solid(1, 1, Rgba8::WHITE), None, &settings).unwrap();
    let out = CpuRasterizer::new(FontBook::new()).rasterize(&scene).unwrap();
    assert_eq!((out.width, out.height), (200, 160));
}

#[test]
fn uploaded_image_is_clipped_to_container() {
    let settings = small_settings();
    // Container 30..70 x 20..60; a 40px wide image pushed to the container's right edge
    // spans 50..90 and must stop at x = 70.
    let doc = DesignDocument::new(LayerId(1))
        .with_uploaded_image(Some("data:image/png;base64,AA==".to_string()))
        .with_layout(&LayoutPatch {
            image_size: Some(100.0),
            image_x_axis: Some(100.0),
            image_y_axis: Some(50.0),
            ..LayoutPatch::default()
        });
    let scene = SideScene::compose(
        Side::Front,
        &doc,
        solid(5, 4, Rgba8::WHITE),
        Some(solid(4, 4, Rgba8::opaque(255, 0, 0))),
        &settings,
    )
    .unwrap();

    let out = CpuRasterizer::new(FontBook::new()).rasterize(&scene).unwrap();
    assert_eq!(out.pixel(65, 40), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(75, 40), Some([255, 255, 255, 255]));
}

#[test]
fn text_is_drawn_inside_container() {
    let settings = RasterSettings {
        container_px: 60.0,
        ..small_settings()
    };
    let doc = DesignDocument::new(LayerId(1)).with_text_updated(
        LayerId(1),
        &TextPatch {
            title: Some("HH".to_string()),
            text_size: Some(24),
            ..TextPatch::default()
        },
    );
    let scene =
        SideScene::compose(Side::Front, &doc, solid(1, 1, Rgba8::WHITE), None, &settings).unwrap();
    let out = dejavu_rasterizer().rasterize(&scene).unwrap();

    let dark = (0..out.height)
        .flat_map(|y| (0..out.width).map(move |x| (x, y)))
        .filter(|&(x, y)| out.pixel(x, y).is_some_and(|p| p[0] < 128))
        .collect::<Vec<_>>();
    assert!(!dark.is_empty(), "text produced no dark pixels");
    // Container spans 20..80 x 10..70.
    assert!(dark.iter().all(|&(x, y)| (20..80).contains(&x) && (10..70).contains(&y)));
}

#[test]
fn text_without_fonts_is_a_rasterization_error() {
    let settings = small_settings();
    let doc = DesignDocument::new(LayerId(1))
        .with_text_updated(LayerId(1), &TextPatch::title("Hi"));
    let scene =
        SideScene::compose(Side::Front, &doc, solid(1, 1, Rgba8::WHITE), None, &settings).unwrap();
    assert!(matches!(
        CpuRasterizer::new(FontBook::new()).rasterize(&scene),
        Err(StitchError::Rasterization(_))
    ));
}

#[test]
fn image_above_covers_text() {
    let settings = RasterSettings {
        container_px: 60.0,
        image_max_width_px: 60.0,
        ..small_settings()
    };
    let doc = DesignDocument::new(LayerId(1))
        .with_text_updated(
            LayerId(1),
            &TextPatch {
                title: Some("HH".to_string()),
                text_size: Some(24),
                ..TextPatch::default()
            },
        )
        .with_layout(&LayoutPatch {
            image_position: Some(ImagePosition::Above),
            image_size: Some(100.0),
            image_y_axis: Some(50.0),
            ..LayoutPatch::default()
        });
    let scene = SideScene::compose(
        Side::Front,
        &doc,
        solid(1, 1, Rgba8::WHITE),
        Some(solid(2, 2, Rgba8::opaque(0, 255, 0))),
        &settings,
    )
    .unwrap();
    let out = dejavu_rasterizer().rasterize(&scene).unwrap();
    for y in 11..69 {
        for x in 21..79 {
            assert_eq!(out.pixel(x, y), Some([0, 255, 0, 255]), "at {x},{y}");
        }
    }
}

#[test]
fn png_encoding_round_trips_dimensions() {
    let img = RasterImage {
        width: 3,
        height: 2,
        rgba8_premul: [128u8, 0, 0, 128].repeat(6),
    };
    let png = img.to_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (3, 2));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 128]);
    assert!(img.to_data_url().unwrap().starts_with("data:image/png;base64,"));
}
