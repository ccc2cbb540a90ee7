//! Types exposed to JavaScript via wasm-bindgen.

use mapfield_core::{Coordinate, FieldConfig, InteractionMode, MapType, Registration};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// Configuration for one map field, as passed to `registerMapField`.
///
/// Only `inputId` is required.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsFieldConfig {
    pub input_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[tsify(type = "\"marker\" | \"polygon\"")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<InteractionMode>,
    #[tsify(type = "\"roadmap\" | \"terrain\" | \"satellite\" | \"hybrid\"")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_type: Option<MapType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<u8>,
    #[tsify(type = "{ lat: number; lng: number }")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_center: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub autocomplete_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_polygon_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_icon: Option<String>,
}

impl From<JsFieldConfig> for FieldConfig {
    fn from(js: JsFieldConfig) -> Self {
        let defaults = FieldConfig::default();
        FieldConfig {
            input_id: js.input_id.into(),
            container_id: js.container_id.map(Into::into).unwrap_or_default(),
            mode: js.mode.unwrap_or(defaults.mode),
            map_type: js.map_type.unwrap_or(defaults.map_type),
            zoom: js.zoom.unwrap_or(defaults.zoom),
            default_center: js.default_center.unwrap_or(defaults.default_center),
            autocomplete_types: js.autocomplete_types.into_iter().map(Into::into).collect(),
            marker_icon: js.marker_icon.map(Into::into).unwrap_or(defaults.marker_icon),
            clear_polygon_icon: js.clear_polygon_icon.map(Into::into),
            location_icon: js.location_icon.map(Into::into),
        }
    }
}

/// Result of `registerMapField`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub enum JsRegistration {
    Added,
    Replaced,
    AlreadyLive,
    /// The page registry was in use; try again later.
    Busy,
}

impl From<Option<Registration>> for JsRegistration {
    fn from(registration: Option<Registration>) -> Self {
        match registration {
            Some(Registration::Added) => JsRegistration::Added,
            Some(Registration::Replaced) => JsRegistration::Replaced,
            Some(Registration::AlreadyLive) => JsRegistration::AlreadyLive,
            None => JsRegistration::Busy,
        }
    }
}

/// Result of `bootMapFields`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct BootReport {
    /// Fields found in the page markup and registered.
    pub registered: usize,
    /// Fields whose embedded configuration did not parse.
    pub skipped: usize,
    /// Maps created by this boot.
    pub initialized: usize,
}
