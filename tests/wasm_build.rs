//! WASM build test
//!
//! Drives the exported API end to end in a wasm environment: session
//! creation, document round-trip, a structural edit and a projection.

#![cfg(target_arch = "wasm32")]

use organizer_wasm::api;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap()
}

#[wasm_bindgen_test]
fn session_round_trips_an_empty_document() {
    api::new_document().unwrap();
    let json = api::save_document().unwrap();
    let reload = api::load_document(&json);
    assert!(reload.is_ok());
}

#[wasm_bindgen_test]
fn add_request_reaches_the_projection() {
    api::new_document().unwrap();
    let notifications = api::request_add(
        to_js(&organizer_wasm::models::RecordKind::PartColor),
        to_js(&organizer_wasm::edit::Placement::AtEnd),
        JsValue::NULL,
    );
    assert!(notifications.is_ok());

    let nodes = api::get_projection(to_js(&organizer_wasm::models::CollectionKind::PartColors));
    assert!(nodes.is_ok());
}

#[wasm_bindgen_test]
fn header_validation_rejects_out_of_range_values() {
    api::new_document().unwrap();
    assert!(api::set_header(1, 2).is_ok());
    assert!(api::set_header(5, 0).is_err());
}
