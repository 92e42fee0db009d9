use super::*;

fn doc() -> (DesignDocument, LayerIdGen) {
    let mut ids = LayerIdGen::default();
    (DesignDocument::new(ids.next_id()), ids)
}

#[test]
fn fresh_side_has_one_default_layer() {
    let (d, _) = doc();
    assert_eq!(d.texts.len(), 1);
    let t = &d.texts[0];
    assert_eq!((t.x_axis, t.y_axis, t.text_size), (50.0, 50.0, 18));
    assert_eq!(t.font_family, "Story Script");
    assert_eq!(t.title_color, "black");
    assert!(!d.is_customized());
    assert_eq!((d.image_x_axis, d.image_y_axis, d.image_size), (50.0, 30.0, 50.0));
}

#[test]
fn add_then_remove_round_trips() {
    let (d, mut ids) = doc();
    let id = ids.next_id();
    let added = d.with_text_added(TextLayer::new(id));
    assert_eq!(added.texts.len(), 2);
    assert_eq!(added.with_text_removed(id), d);
}

#[test]
fn last_layer_is_never_removed() {
    let (d, _) = doc();
    let only = d.texts[0].id;
    assert!(!d.can_remove_text());
    assert_eq!(d.with_text_removed(only).texts.len(), 1);
}

#[test]
fn remove_unknown_id_is_noop() {
    let (d, mut ids) = doc();
    let d = d.with_text_added(TextLayer::new(ids.next_id()));
    assert_eq!(d.with_text_removed(LayerId(999)), d);
}

#[test]
fn update_merges_and_clamps() {
    let (d, _) = doc();
    let id = d.texts[0].id;
    let patch = TextPatch {
        title: Some("Hello".to_string()),
        text_size: Some(80),
        x_axis: Some(-5.0),
        ..TextPatch::default()
    };
    let updated = d.with_text_updated(id, &patch);
    let t = updated.text(id).unwrap();
    assert_eq!(t.title, "Hello");
    assert_eq!(t.text_size, 48);
    assert_eq!(t.x_axis, 0.0);
    assert_eq!(t.y_axis, 50.0);
    assert_eq!(t.font_family, "Story Script");
    assert!(updated.is_customized());

    assert_eq!(d.with_text_updated(LayerId(77), &patch), d);
}

#[test]
fn whitespace_titles_do_not_count_as_customized() {
    let (d, _) = doc();
    let id = d.texts[0].id;
    let d = d.with_text_updated(id, &TextPatch::title("   "));
    assert!(!d.is_customized());
    assert!(d.with_uploaded_image(Some("data:image/png;base64,AA==".into())).is_customized());
    assert!(!d.with_uploaded_image(Some(String::new())).is_customized());
}

#[test]
fn layout_patch_merges_and_clamps() {
    let (d, _) = doc();
    let d2 = d.with_layout(&LayoutPatch {
        image_position: Some(ImagePosition::Above),
        image_size: Some(4.0),
        container_y_axis: Some(120.0),
        ..LayoutPatch::default()
    });
    assert_eq!(d2.image_position, ImagePosition::Above);
    assert_eq!(d2.image_size, 10.0);
    assert_eq!(d2.container_y_axis, 100.0);
    assert_eq!(d2.container_x_axis, d.container_x_axis);
    assert_eq!(d2.texts, d.texts);
}

#[test]
fn id_gen_continues_after_existing_layers() {
    let a = DesignDocument::new(LayerId(4));
    let b = DesignDocument::new(LayerId(9));
    let mut ids = LayerIdGen::after([&a, &b]);
    assert_eq!(ids.next_id(), LayerId(10));
}
