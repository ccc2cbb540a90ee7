//! Bindings to the part of the Google Maps JavaScript API the map fields use.
//!
//! Only classes and enums that exist once the provider script has loaded are
//! referenced here. Constructors that run first in a session are `catch` so a
//! missing or broken provider surfaces as an error instead of an exception.

use js_sys::{Array, Function, Object, Reflect};
use mapfield_core::Coordinate;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(js_namespace = ["google", "maps"])]
extern "C" {
    /// `google.maps.Map`
    #[wasm_bindgen(js_name = Map)]
    #[derive(Clone, Debug)]
    pub type GoogleMap;

    #[wasm_bindgen(constructor, catch, js_class = "Map")]
    pub fn new(container: &web_sys::HtmlElement, options: &JsValue) -> Result<GoogleMap, JsValue>;

    #[wasm_bindgen(method, js_class = "Map", js_name = setCenter)]
    pub fn set_center(this: &GoogleMap, center: &JsValue);

    #[wasm_bindgen(method, js_class = "Map", js_name = setZoom)]
    pub fn set_zoom(this: &GoogleMap, zoom: f64);

    #[wasm_bindgen(method, js_class = "Map", js_name = setOptions)]
    pub fn set_options(this: &GoogleMap, options: &JsValue);

    /// Per-position control slots, indexed by `ControlPosition` values.
    #[wasm_bindgen(method, getter, js_class = "Map")]
    pub fn controls(this: &GoogleMap) -> JsValue;

    #[derive(Clone, Debug)]
    pub type Marker;

    #[wasm_bindgen(constructor)]
    pub fn new(options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setMap)]
    pub fn set_map(this: &Marker, map: &JsValue);

    #[derive(Clone, Debug)]
    pub type Polygon;

    #[wasm_bindgen(constructor)]
    pub fn new(options: &JsValue) -> Polygon;

    #[wasm_bindgen(method, js_name = setPath)]
    pub fn set_path(this: &Polygon, path: &Array);

    #[wasm_bindgen(method, js_name = getPath)]
    pub fn get_path(this: &Polygon) -> MvcArray;

    #[wasm_bindgen(js_name = MVCArray)]
    #[derive(Clone, Debug)]
    pub type MvcArray;

    #[wasm_bindgen(method, js_class = "MVCArray", js_name = getLength)]
    pub fn get_length(this: &MvcArray) -> u32;

    #[wasm_bindgen(method, js_class = "MVCArray", js_name = getAt)]
    pub fn get_at(this: &MvcArray, index: u32) -> JsValue;

    #[wasm_bindgen(method, js_class = "MVCArray")]
    pub fn push(this: &MvcArray, element: &JsValue) -> u32;

    #[derive(Clone, Debug)]
    pub type LatLng;

    #[wasm_bindgen(method)]
    pub fn lat(this: &LatLng) -> f64;

    #[wasm_bindgen(method)]
    pub fn lng(this: &LatLng) -> f64;

    #[derive(Clone, Debug)]
    pub type Size;

    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Size;

    #[derive(Clone, Debug)]
    pub type MapMouseEvent;

    #[wasm_bindgen(method, getter, js_name = latLng)]
    pub fn lat_lng(this: &MapMouseEvent) -> Option<LatLng>;

    #[derive(Clone, Debug)]
    pub type MapsEventListener;

    #[wasm_bindgen(method)]
    pub fn remove(this: &MapsEventListener);
}

#[wasm_bindgen(js_namespace = ["google", "maps", "event"])]
extern "C" {
    #[wasm_bindgen(js_name = addListener)]
    pub fn add_listener(instance: &JsValue, event_name: &str, handler: &Function) -> MapsEventListener;
}

#[wasm_bindgen(js_namespace = ["google", "maps", "places"])]
extern "C" {
    /// `google.maps.places.Autocomplete`
    #[derive(Clone, Debug)]
    pub type Autocomplete;

    #[wasm_bindgen(constructor, catch)]
    pub fn new(
        input: &web_sys::HtmlInputElement,
        options: &JsValue,
    ) -> Result<Autocomplete, JsValue>;

    #[wasm_bindgen(method, js_name = getPlace)]
    pub fn get_place(this: &Autocomplete) -> JsValue;

    #[wasm_bindgen(method, js_name = bindTo)]
    pub fn bind_to(this: &Autocomplete, key: &str, target: &JsValue);
}

/// Where a custom control is docked on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    RightBottom,
}

impl ControlPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlPosition::TopLeft => "TOP_LEFT",
            ControlPosition::TopRight => "TOP_RIGHT",
            ControlPosition::BottomLeft => "BOTTOM_LEFT",
            ControlPosition::RightBottom => "RIGHT_BOTTOM",
        }
    }

    /// The provider's runtime value for this position.
    pub fn resolve(&self) -> Result<JsValue, JsValue> {
        maps_enum("ControlPosition", self.as_str())
    }
}

/// The `google.maps` namespace object, if the provider has loaded.
fn maps_namespace() -> Result<JsValue, JsValue> {
    let google = Reflect::get(&js_sys::global(), &"google".into())?;
    if google.is_undefined() || google.is_null() {
        return Err(JsValue::from_str("google namespace not loaded"));
    }
    Reflect::get(&google, &"maps".into())
}

/// Whether `google.maps` is already present on the page.
pub fn is_loaded() -> bool {
    maps_namespace().is_ok_and(|maps| !maps.is_undefined())
}

/// Look up a member of one of the provider's enums, e.g.
/// `google.maps.MapTypeControlStyle.HORIZONTAL_BAR`.
pub fn maps_enum(enum_name: &str, member: &str) -> Result<JsValue, JsValue> {
    let namespace = Reflect::get(&maps_namespace()?, &enum_name.into())?;
    Reflect::get(&namespace, &member.into())
}

/// Dock `element` into one of the map's control slots.
pub fn push_control(
    map: &GoogleMap,
    position: ControlPosition,
    element: &web_sys::Element,
) -> Result<(), JsValue> {
    let slot: MvcArray = Reflect::get(&map.controls(), &position.resolve()?)?.unchecked_into();
    slot.push(element);
    Ok(())
}

/// Plain options object assembled key by key.
pub struct Options(Object);

impl Options {
    pub fn new() -> Self {
        Self(Object::new())
    }

    pub fn set(self, key: &str, value: impl Into<JsValue>) -> Result<Self, JsValue> {
        Reflect::set(&self.0, &JsValue::from_str(key), &value.into())?;
        Ok(self)
    }

    pub fn into_js(self) -> JsValue {
        self.0.into()
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

/// `{lat, lng}` literal accepted wherever the provider takes a position.
pub fn lat_lng_literal(at: Coordinate) -> Result<JsValue, JsValue> {
    Ok(Options::new()
        .set("lat", at.lat())?
        .set("lng", at.lng())?
        .into_js())
}

/// Read a provider `LatLng` back into a validated coordinate.
pub fn coordinate_of(value: &JsValue) -> Option<Coordinate> {
    if value.is_undefined() || value.is_null() {
        return None;
    }
    let lat_lng: &LatLng = value.unchecked_ref();
    match Coordinate::new(lat_lng.lat(), lat_lng.lng()) {
        Ok(at) => Some(at),
        Err(err) => {
            tracing::debug!(error = %err, "provider returned an unusable position");
            None
        }
    }
}
