//! Optional place-search box for a field's map.

use js_sys::{Array, Reflect};
use mapfield_core::{Coordinate, SmolStr};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlInputElement};

use crate::error::SessionError;
use crate::google::{self, Autocomplete, ControlPosition, GoogleMap, Options};

/// Zoom level applied after a place is chosen.
pub const SEARCH_ZOOM: u8 = 15;

const PLACEHOLDER: &str = "Search location";

const INPUT_STYLE: &str = "margin: 10px; padding: 0 12px; height: 40px; width: 240px; \
     border: none; border-radius: 2px; box-shadow: rgba(0, 0, 0, 0.3) 0 1px 4px -1px; \
     font-size: 15px;";

/// A live search box. Dropping it stops place notifications.
pub struct SearchBox {
    _on_place: Closure<dyn FnMut()>,
}

impl SearchBox {
    /// Dock a search input top-left on `map`, restricted to `types`.
    ///
    /// `on_place` receives the location of each chosen place. Places
    /// without geometry are ignored.
    pub fn attach<F>(
        document: &Document,
        map: &GoogleMap,
        types: &[SmolStr],
        mut on_place: F,
    ) -> Result<Self, SessionError>
    where
        F: FnMut(Coordinate) + 'static,
    {
        let input: HtmlInputElement = document
            .create_element("input")?
            .dyn_into()
            .map_err(|_| SessionError::WrongElement {
                id: SmolStr::new_static("search"),
                expected: "an <input>",
            })?;
        input.set_type("text");
        input.set_placeholder(PLACEHOLDER);
        input.set_attribute("style", INPUT_STYLE)?;

        let type_list: Array = types.iter().map(|t| JsValue::from_str(t)).collect();
        let options = Options::new().set("types", type_list)?.into_js();
        let autocomplete = Autocomplete::new(&input, &options)?;
        autocomplete.bind_to("bounds", map);

        google::push_control(map, ControlPosition::TopLeft, &input)?;

        let source = autocomplete.clone();
        let on_place = Closure::<dyn FnMut()>::new(move || {
            match place_location(&source.get_place()) {
                Some(at) => {
                    tracing::trace!(%at, "place chosen");
                    on_place(at);
                }
                None => tracing::debug!("chosen place has no geometry"),
            }
        });
        google::add_listener(&autocomplete, "place_changed", on_place.as_ref().unchecked_ref());

        Ok(Self { _on_place: on_place })
    }
}

/// `place.geometry.location`, if present.
fn place_location(place: &JsValue) -> Option<Coordinate> {
    if place.is_undefined() || place.is_null() {
        return None;
    }
    let geometry = Reflect::get(place, &"geometry".into()).ok()?;
    if geometry.is_undefined() || geometry.is_null() {
        return None;
    }
    let location = Reflect::get(&geometry, &"location".into()).ok()?;
    google::coordinate_of(&location)
}
