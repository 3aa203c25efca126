//! Fullscreen toggle with a fallback to the `webkit`-prefixed API (Safari).
//! When neither exists the toggle does nothing.

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

fn prefixed_method(target: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.dyn_into::<Function>().ok())
}

fn is_fullscreen(document: &web::Document) -> bool {
    if document.fullscreen_element().is_some() {
        return true;
    }
    Reflect::get(document, &JsValue::from_str("webkitFullscreenElement"))
        .map(|v| !v.is_null() && !v.is_undefined())
        .unwrap_or(false)
}

pub fn toggle(document: &web::Document, element: &web::Element) {
    if is_fullscreen(document) {
        if prefixed_method(document, "exitFullscreen").is_some() {
            _ = document.exit_fullscreen();
        } else if let Some(f) = prefixed_method(document, "webkitExitFullscreen") {
            _ = f.call0(document);
        }
    } else if prefixed_method(element, "requestFullscreen").is_some() {
        _ = element.request_fullscreen();
    } else if let Some(f) = prefixed_method(element, "webkitRequestFullscreen") {
        _ = f.call0(element);
    }
}
