use std::collections::HashMap;

use super::*;

#[test]
fn empty_json_yields_defaults() {
    let cfg: StorefrontConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, StorefrontConfig::default());
    assert_eq!(cfg.pricing.single_side_price, 4.0);
    assert_eq!(cfg.pricing.both_price, 8.0);
    assert_eq!(cfg.raster.output_size(), (1400, 1200));
}

#[test]
fn partial_sections_keep_other_defaults() {
    let cfg: StorefrontConfig =
        serde_json::from_str(r#"{"raster":{"pixel_ratio":1.0},"api":{"base_url":"http://x"}}"#)
            .unwrap();
    assert_eq!(cfg.raster.output_size(), (700, 600));
    assert_eq!(cfg.raster.container_px, 240.0);
    assert_eq!(cfg.api.base_url, "http://x");
    assert_eq!(cfg.api.customize, "/api/product-customize");
}

#[test]
fn env_overrides_apply_and_ignore_garbage() {
    let env: HashMap<&str, &str> = [
        ("STITCHWORK_API_BASE_URL", "https://shop.example/"),
        ("STITCHWORK_PIXEL_RATIO", "-1"),
        ("STITCHWORK_FONT_DIR", "fonts"),
    ]
    .into_iter()
    .collect();
    let cfg = StorefrontConfig::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));
    assert_eq!(cfg.api.base_url, "https://shop.example");
    assert_eq!(cfg.raster.pixel_ratio, 2.0);
    assert_eq!(cfg.font_dir, Some(PathBuf::from("fonts")));
}

#[test]
fn raster_validation_rejects_bad_geometry() {
    let mut s = RasterSettings::default();
    s.pixel_ratio = 0.0;
    assert!(s.validate().is_err());

    let mut s = RasterSettings::default();
    s.canvas_width = 40_000;
    assert!(s.validate().is_err());

    assert!(RasterSettings::default().validate().is_ok());
}
