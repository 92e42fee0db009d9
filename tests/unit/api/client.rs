use serde_json::json;

use super::*;

#[test]
fn customization_id_prefers_data_wrapper() {
    let body = json!({"data": {"customization_id": 41}, "customization_id": 9});
    let id = CustomizationId::from_response(&body).unwrap();
    assert_eq!(id.to_string(), "41");

    let id = CustomizationId::from_response(&json!({"customization_id": "c-9"})).unwrap();
    assert_eq!(id.to_string(), "c-9");
}

#[test]
fn customization_id_falsy_values_are_missing() {
    for body in [
        json!({}),
        json!({"data": {"customization_id": null}}),
        json!({"customization_id": ""}),
        json!({"customization_id": 0}),
        json!({"data": {}}),
    ] {
        assert!(CustomizationId::from_response(&body).is_none(), "{body}");
    }
    // A falsy wrapped id still lets the top-level one through.
    let body = json!({"data": {"customization_id": 0}, "customization_id": 3});
    let id = CustomizationId::from_response(&body);
    assert_eq!(id.map(|i| i.to_string()).as_deref(), Some("3"));
}

#[test]
fn add_to_cart_request_wire_shape() {
    let req = AddToCartRequest {
        product_id: 2,
        qty: 1,
        customization_id: CustomizationId(json!(17)),
        price: 4.0,
    };
    assert_eq!(
        serde_json::to_value(&req).unwrap(),
        json!({"product_id": 2, "qty": 1, "customization_id": 17, "price": 4.0})
    );
}

#[test]
fn user_message_prefers_server_text() {
    let e = ApiError::Status {
        status: 422,
        message: "Out of stock".to_string(),
    };
    assert_eq!(e.user_message(), "Out of stock");
    assert!(matches!(StitchError::from(e), StitchError::Network(m) if m == "Out of stock"));

    let e = ApiError::Status {
        status: 500,
        message: String::new(),
    };
    assert!(e.user_message().contains("500"));
}
