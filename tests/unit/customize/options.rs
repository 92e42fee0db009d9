use super::*;
use crate::{
    customize::design::{LayerId, TextLayer},
    foundation::core::Rgba8,
};

#[test]
fn every_offered_color_renders() {
    for option in &COLOR_OPTIONS {
        assert!(
            Rgba8::parse_css(option.value).is_some(),
            "{} has no paint",
            option.id
        );
    }
}

#[test]
fn new_layers_start_on_offered_choices() {
    let layer = TextLayer::new(LayerId(1));
    assert!(FONT_OPTIONS.iter().any(|f| f.value == layer.font_family));
    assert!(COLOR_OPTIONS.iter().any(|c| c.value == layer.title_color));
}

#[test]
fn option_ids_are_unique() {
    let mut fonts: Vec<_> = FONT_OPTIONS.iter().map(|f| f.id).collect();
    fonts.sort_unstable();
    fonts.dedup();
    assert_eq!(fonts.len(), FONT_OPTIONS.len());

    let mut colors: Vec<_> = COLOR_OPTIONS.iter().map(|c| c.id).collect();
    colors.sort_unstable();
    colors.dedup();
    assert_eq!(colors.len(), COLOR_OPTIONS.len());
}
