//! Custom buttons docked on the map: clear-polygon and go-to-my-location.
//!
//! The buttons are plain DOM; listeners are attached by `wiring` once the
//! session is live.

use mapfield_core::Coordinate;
use smol_str::{SmolStr, format_smolstr};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlButtonElement, HtmlElement};

use crate::error::SessionError;

const CLEAR_BUTTON_PREFIX: &str = "mapfield-clear-polygon-";
const LOCATE_BUTTON_PREFIX: &str = "mapfield-locate-";

const BUTTON_STYLE: &str = "background-color: #fff; border: none; border-radius: 50%; \
     box-shadow: rgba(0, 0, 0, 0.3) 0 1px 4px -1px; cursor: pointer; \
     width: 40px; height: 40px; margin: 10px; padding: 8px; \
     display: flex; align-items: center; justify-content: center;";

const ICON_STYLE: &str = "width: 24px; height: 24px;";

pub fn clear_button_id(input_id: &str) -> SmolStr {
    format_smolstr!("{CLEAR_BUTTON_PREFIX}{input_id}")
}

pub fn locate_button_id(input_id: &str) -> SmolStr {
    format_smolstr!("{LOCATE_BUTTON_PREFIX}{input_id}")
}

/// Round white button that empties a polygon field.
pub fn clear_button(
    document: &Document,
    input_id: &str,
    icon: Option<&str>,
) -> Result<HtmlButtonElement, SessionError> {
    round_button(document, &clear_button_id(input_id), "Clear polygon", "\u{2715}", icon)
}

/// Round white button that recentres the map on the visitor's position.
pub fn locate_button(
    document: &Document,
    input_id: &str,
    icon: Option<&str>,
) -> Result<HtmlButtonElement, SessionError> {
    round_button(
        document,
        &locate_button_id(input_id),
        "Go to my location",
        "\u{2316}",
        icon,
    )
}

fn round_button(
    document: &Document,
    id: &str,
    label: &str,
    fallback_text: &str,
    icon: Option<&str>,
) -> Result<HtmlButtonElement, SessionError> {
    let button: HtmlButtonElement = document
        .create_element("button")?
        .dyn_into()
        .map_err(|_| SessionError::WrongElement {
            id: SmolStr::new(id),
            expected: "a <button>",
        })?;
    // Buttons live inside the host form; never submit it.
    button.set_type("button");
    button.set_id(id);
    button.set_title(label);
    button.set_attribute("aria-label", label)?;
    button.set_attribute("style", BUTTON_STYLE)?;

    match icon {
        Some(src) => {
            let img = document.create_element("img")?;
            img.set_attribute("src", src)?;
            img.set_attribute("alt", "")?;
            img.set_attribute("style", ICON_STYLE)?;
            button.append_child(&img)?;
        }
        None => button.set_text_content(Some(fallback_text)),
    }
    Ok(button)
}

/// Show or hide a control without detaching it from the map.
pub fn set_visible(element: &HtmlElement, visible: bool) {
    let display = if visible { "flex" } else { "none" };
    if let Err(err) = element.style().set_property("display", display) {
        tracing::warn!(?err, "failed to toggle control visibility");
    }
}

pub fn is_visible(element: &HtmlElement) -> bool {
    element
        .style()
        .get_property_value("display")
        .is_ok_and(|display| display != "none")
}

/// Ask the browser for the visitor's position and hand it to `on_found`.
///
/// Denied permission, timeouts, and unusable positions are logged and
/// otherwise ignored.
pub fn locate_current_position<F>(on_found: F)
where
    F: FnOnce(Coordinate) + 'static,
{
    let Some(window) = web_sys::window() else {
        return;
    };
    let geolocation = match window.navigator().geolocation() {
        Ok(geolocation) => geolocation,
        Err(err) => {
            tracing::warn!(?err, "geolocation unavailable");
            return;
        }
    };

    let success = Closure::once_into_js(move |position: JsValue| match position_coordinate(&position) {
        Some(at) => {
            tracing::trace!(%at, "geolocation resolved");
            on_found(at);
        }
        None => tracing::debug!("geolocation returned no usable coordinates"),
    });
    let failure = Closure::once_into_js(move |err: JsValue| {
        tracing::warn!(?err, "geolocation request failed");
    });

    if let Err(err) = geolocation.get_current_position_with_error_callback(
        success.unchecked_ref(),
        Some(failure.unchecked_ref()),
    ) {
        tracing::warn!(?err, "geolocation request rejected");
    }
}

fn position_coordinate(position: &JsValue) -> Option<Coordinate> {
    let coords = js_sys::Reflect::get(position, &"coords".into()).ok()?;
    let lat = js_sys::Reflect::get(&coords, &"latitude".into()).ok()?.as_f64()?;
    let lng = js_sys::Reflect::get(&coords, &"longitude".into()).ok()?.as_f64()?;
    Coordinate::new(lat, lng).ok()
}
