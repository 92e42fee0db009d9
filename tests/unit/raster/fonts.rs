use super::*;

const DEJAVU: &str = "tests/data/fonts/DejaVuSans.ttf";

fn book_with_dejavu() -> FontBook {
    let mut book = FontBook::new();
    let bytes = std::fs::read(DEJAVU).unwrap();
    book.register(bytes, Some("Story Script")).unwrap();
    book
}

#[test]
fn register_exposes_family_name() {
    let book = book_with_dejavu();
    let families: Vec<_> = book.families().collect();
    assert_eq!(families, vec!["DejaVu Sans"]);
}

#[test]
fn resolve_ignores_case_and_spacing_and_falls_back() {
    let book = book_with_dejavu();
    assert_eq!(book.resolve("dejavu-sans").unwrap().family, "DejaVu Sans");
    assert_eq!(book.resolve("STORY SCRIPT").unwrap().family, "DejaVu Sans");
    assert_eq!(book.resolve("Michroma").unwrap().family, "DejaVu Sans");
    assert!(FontBook::new().resolve("Michroma").is_none());
}

#[test]
fn garbage_bytes_do_not_register() {
    let mut book = FontBook::new();
    assert!(book.register(b"nope".to_vec(), None).is_err());
    assert!(book.is_empty());
}

#[test]
fn layout_wraps_at_max_width() {
    let mut book = book_with_dejavu();
    let single = book
        .layout("hello world again", "DejaVu Sans", 18.0, Rgba8::BLACK, None)
        .unwrap();
    assert_eq!(single.lines().count(), 1);

    let wrapped = book
        .layout("hello world again", "DejaVu Sans", 18.0, Rgba8::BLACK, Some(60.0))
        .unwrap();
    assert!(wrapped.lines().count() > 1);
    assert!(wrapped.height() > single.height());
}

#[test]
fn layout_requires_a_font_and_a_positive_size() {
    let mut empty = FontBook::new();
    assert!(matches!(
        empty.layout("x", "Manrope", 18.0, Rgba8::BLACK, None),
        Err(StitchError::Rasterization(_))
    ));

    let mut book = book_with_dejavu();
    assert!(book.layout("x", "Manrope", 0.0, Rgba8::BLACK, None).is_err());
}

#[test]
fn load_dir_registers_font_files_only() {
    let mut book = FontBook::new();
    let n = book.load_dir(Path::new("tests/data/fonts")).unwrap();
    assert_eq!(n, 2);
    assert_eq!(book.resolve("DejaVuSerif").unwrap().family, "DejaVu Serif");
    assert_eq!(book.resolve("DejaVuSans").unwrap().family, "DejaVu Sans");

    assert!(FontBook::new().load_dir(Path::new("tests/data/missing")).is_err());
}

#[test]
fn glyph_runs_carry_the_face_they_were_shaped_with() {
    let sans = std::fs::read(DEJAVU).unwrap();
    let serif = std::fs::read("tests/data/fonts/DejaVuSerif.ttf").unwrap();
    let mut book = FontBook::new();
    book.register(sans.clone(), None).unwrap();
    book.register(serif.clone(), None).unwrap();

    for (family, bytes) in [("DejaVu Serif", &serif), ("DejaVu Sans", &sans)] {
        let layout = book
            .layout("Hamburgefonts", family, 24.0, Rgba8::BLACK, None)
            .unwrap();
        let mut runs = 0;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                assert_eq!(run.run().font().data.data(), bytes.as_slice(), "{family}");
                runs += 1;
            }
        }
        assert!(runs > 0);
    }
}
