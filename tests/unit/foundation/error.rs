use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StitchError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        StitchError::network("x")
            .to_string()
            .contains("network error:")
    );
    assert!(
        StitchError::rasterization("x")
            .to_string()
            .contains("rasterization error:")
    );
    assert!(
        StitchError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn missing_base_image_names_the_side() {
    let err = StitchError::MissingBaseImage { side: Side::Back };
    assert_eq!(err.to_string(), "back base image is missing");
}

#[test]
fn only_stock_ceiling_is_a_warning() {
    assert!(StitchError::StockExceeded { available: 3 }.is_warning());
    assert!(!StitchError::NoCustomizationProvided.is_warning());
    assert!(
        !StitchError::CartMutationFailed {
            reason: "x".to_string()
        }
        .is_warning()
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StitchError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde() {
    let e = serde_json::from_str::<u32>("nope").unwrap_err();
    assert!(matches!(StitchError::from(e), StitchError::Serde(_)));
}
