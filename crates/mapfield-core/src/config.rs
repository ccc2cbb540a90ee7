//! Per-field configuration.
//!
//! Every rendered field carries a serialized [`FieldConfig`]; the page boot
//! reads it back to register the field's session. Everything except the
//! input id has a default, so `{"inputId": "input_1_3"}` is a complete
//! marker-mode configuration.

use std::time::Duration;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};
use thiserror::Error;

use crate::coords::Coordinate;

/// Wait after a drag gesture ends before reading the overlay path back.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Wait after the provider signals readiness before creating maps.
pub const READY_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Global name of the provider's load callback.
pub const READY_CALLBACK: &str = "mapfieldProviderReady";

const STOCK_ICON_BASE: &str = "https://maps.google.com/mapfiles/ms/icons/";
const PROVIDER_SCRIPT: &str = "https://maps.googleapis.com/maps/api/js";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("invalid map field configuration: {0}")]
    #[diagnostic(code(mapfield::config::json))]
    Json(#[from] serde_json::Error),

    #[error("map field configuration has no input id")]
    #[diagnostic(
        code(mapfield::config::missing_input),
        help("set `inputId` to the id of the bound text input")
    )]
    MissingInputId,

    #[error("map field configuration has no container id")]
    #[diagnostic(
        code(mapfield::config::missing_container),
        help("set `containerId`, or use an `input_{{form}}_{{field}}` input id")
    )]
    MissingContainerId,

    #[error("invalid provider script url: {0}")]
    #[diagnostic(code(mapfield::config::url))]
    Url(#[from] url::ParseError),
}

/// How clicks on the map are interpreted. Fixed for the session's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Single point selection.
    #[default]
    Marker,
    /// Closed multi-vertex area selection.
    Polygon,
}

/// Base map style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    Roadmap,
    #[default]
    Terrain,
    Satellite,
    Hybrid,
}

impl MapType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapType::Roadmap => "roadmap",
            MapType::Terrain => "terrain",
            MapType::Satellite => "satellite",
            MapType::Hybrid => "hybrid",
        }
    }
}

/// The form id / field id pair the host assigns to a field instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldKeys {
    pub form_id: u32,
    pub field_id: u32,
}

impl FieldKeys {
    pub fn new(form_id: u32, field_id: u32) -> Self {
        Self { form_id, field_id }
    }

    /// DOM id of the bound text input, also the session key.
    pub fn input_id(&self) -> SmolStr {
        format_smolstr!("input_{}_{}", self.form_id, self.field_id)
    }

    /// Form post name of the bound text input.
    pub fn input_name(&self) -> SmolStr {
        format_smolstr!("input_{}", self.field_id)
    }

    pub fn field_key(&self) -> SmolStr {
        format_smolstr!("field_{}_{}", self.form_id, self.field_id)
    }

    /// DOM id of the map container element.
    pub fn container_id(&self) -> SmolStr {
        format_smolstr!("map-container-{}", self.field_key())
    }
}

/// Where a field without a stored value opens.
pub const DEFAULT_CENTER: Coordinate = Coordinate::from_valid(-34.397, 150.644);

pub const DEFAULT_ZOOM: u8 = 8;

const DEFAULT_MARKER_ICON: &str = "marker_yellow";

/// Configuration for one map field instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldConfig {
    /// Id of the bound text input; unique per page.
    pub input_id: SmolStr,
    /// Id of the element the map is drawn into.
    pub container_id: SmolStr,
    pub mode: InteractionMode,
    pub map_type: MapType,
    pub zoom: u8,
    /// Where the map opens when the field has no stored value.
    pub default_center: Coordinate,
    /// Place categories for the search box; empty disables search.
    pub autocomplete_types: Vec<SmolStr>,
    /// Stock icon name or absolute icon URL.
    pub marker_icon: SmolStr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_polygon_icon: Option<SmolStr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_icon: Option<SmolStr>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            input_id: SmolStr::default(),
            container_id: SmolStr::default(),
            mode: InteractionMode::default(),
            map_type: MapType::default(),
            zoom: DEFAULT_ZOOM,
            default_center: DEFAULT_CENTER,
            autocomplete_types: Vec::new(),
            marker_icon: SmolStr::new_static(DEFAULT_MARKER_ICON),
            clear_polygon_icon: None,
            location_icon: None,
        }
    }
}

impl FieldConfig {
    /// Configuration for the field identified by `keys`, with all defaults.
    pub fn for_field(keys: FieldKeys) -> Self {
        Self {
            input_id: keys.input_id(),
            container_id: keys.container_id(),
            ..Self::default()
        }
    }

    /// Parse the JSON a rendered field carries.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(text)?;
        config.validated()
    }

    /// Check the fields no default can stand in for.
    ///
    /// A missing container id is derived from a host-assigned input id.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.input_id.is_empty() {
            return Err(ConfigError::MissingInputId);
        }
        if self.container_id.is_empty() {
            self.container_id =
                container_id_for(&self.input_id).ok_or(ConfigError::MissingContainerId)?;
        }
        Ok(self)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn has_search(&self) -> bool {
        !self.autocomplete_types.is_empty()
    }

    pub fn marker_icon_url(&self) -> String {
        marker_icon_url(&self.marker_icon)
    }
}

/// `input_1_3` -> `map-container-field_1_3`.
fn container_id_for(input_id: &str) -> Option<SmolStr> {
    let rest = input_id.strip_prefix("input_")?;
    Some(format_smolstr!("map-container-field_{rest}"))
}

/// Resolve a marker icon setting to a URL.
///
/// Anything that looks like a URL is used as-is; other values name one of
/// the provider's stock icons.
pub fn marker_icon_url(icon: &str) -> String {
    if icon.contains("http") {
        icon.to_string()
    } else {
        format!("{STOCK_ICON_BASE}{icon}.png")
    }
}

/// Page-wide settings for loading the mapping provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: SmolStr,
    /// Global function the provider calls once it has loaded.
    pub callback: SmolStr,
}

impl ProviderSettings {
    pub fn new(api_key: impl Into<SmolStr>) -> Self {
        Self {
            api_key: api_key.into(),
            callback: SmolStr::new_static(READY_CALLBACK),
        }
    }

    /// URL of the provider script. `with_places` adds the places library
    /// needed by the search box.
    pub fn script_url(&self, with_places: bool) -> Result<url::Url, ConfigError> {
        let mut params: Vec<(&str, &str)> = vec![("key", self.api_key.as_str())];
        if with_places {
            params.push(("libraries", "places"));
        }
        params.push(("loading", "async"));
        params.push(("callback", self.callback.as_str()));
        Ok(url::Url::parse_with_params(PROVIDER_SCRIPT, params)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_keys() {
        let keys = FieldKeys::new(1, 3);
        assert_eq!(keys.input_id(), "input_1_3");
        assert_eq!(keys.input_name(), "input_3");
        assert_eq!(keys.container_id(), "map-container-field_1_3");
    }

    #[test]
    fn test_defaults_from_minimal_json() {
        let config = FieldConfig::from_json(r#"{"inputId":"input_1_3"}"#).unwrap();
        assert_eq!(config.mode, InteractionMode::Marker);
        assert_eq!(config.map_type, MapType::Terrain);
        assert_eq!(config.zoom, 8);
        assert_eq!(config.default_center, Coordinate::new(-34.397, 150.644).unwrap());
        assert_eq!(config.marker_icon, "marker_yellow");
        assert_eq!(config.container_id, "map-container-field_1_3");
        assert!(!config.has_search());
    }

    #[test]
    fn test_full_json() {
        let config = FieldConfig::from_json(
            r#"{
                "inputId": "input_2_5",
                "containerId": "map-container-field_2_5",
                "mode": "polygon",
                "mapType": "satellite",
                "zoom": 12,
                "defaultCenter": {"lat": 51.5, "lng": -0.12},
                "autocompleteTypes": ["geocode"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.mode, InteractionMode::Polygon);
        assert_eq!(config.map_type.as_str(), "satellite");
        assert_eq!(config.zoom, 12);
        assert!(config.has_search());
    }

    #[test]
    fn test_config_errors() {
        assert!(matches!(
            FieldConfig::from_json("{}"),
            Err(ConfigError::MissingInputId)
        ));
        assert!(matches!(
            FieldConfig::from_json(r#"{"inputId":"custom"}"#),
            Err(ConfigError::MissingContainerId)
        ));
        assert!(FieldConfig::from_json(r#"{"inputId":"custom","containerId":"map"}"#).is_ok());
        assert!(matches!(
            FieldConfig::from_json(r#"{"inputId":"x","mode":"circle"}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(FieldConfig::from_json(r#"{"inputId":"x","defaultCenter":{"lat":95,"lng":0}}"#)
            .is_err());
    }

    #[test]
    fn test_missing_container_help() {
        let err = FieldConfig::from_json(r#"{"inputId":"custom"}"#).unwrap_err();
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("mapfield::config::missing_container")
        );
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("`input_{form}_{field}`"), "help was: {help}");
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = FieldConfig::for_field(FieldKeys::new(4, 9));
        config.mode = InteractionMode::Polygon;
        config.autocomplete_types = vec!["establishment".into()];
        let back = FieldConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_marker_icon_url() {
        assert_eq!(
            marker_icon_url("marker_yellow"),
            "https://maps.google.com/mapfiles/ms/icons/marker_yellow.png"
        );
        assert_eq!(
            marker_icon_url("https://example.com/pin.png"),
            "https://example.com/pin.png"
        );
    }

    #[test]
    fn test_script_url() {
        let settings = ProviderSettings::new("abc 123");
        let plain = settings.script_url(false).unwrap();
        assert_eq!(
            plain.as_str(),
            "https://maps.googleapis.com/maps/api/js?key=abc+123&loading=async&callback=mapfieldProviderReady"
        );
        let with_places = settings.script_url(true).unwrap();
        assert!(with_places.as_str().contains("&libraries=places&"));
    }
}
