//! `MapSurface` over a Google map.

use js_sys::Array;
use mapfield_core::{
    Coordinate, FieldConfig, MapSurface, PolygonOverlay, PolygonStyle, SmolStr,
};
use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlButtonElement, HtmlElement};

use crate::controls;
use crate::error::SessionError;
use crate::google::{
    self, ControlPosition, GoogleMap, Marker, Options, Polygon, Size, lat_lng_literal,
};

const MARKER_WIDTH: f64 = 25.0;
const MARKER_HEIGHT: f64 = 30.0;

/// One field's Google map plus the controls docked on it.
pub struct GoogleSurface {
    map: GoogleMap,
    container: HtmlElement,
    document: Document,
    input_id: SmolStr,
    marker_icon: String,
    clear_icon: Option<SmolStr>,
    clear_button: Option<HtmlButtonElement>,
    locate_button: Option<HtmlButtonElement>,
}

impl GoogleSurface {
    /// Draw a map into `container` configured for `config`.
    ///
    /// Fails when the provider has not loaded or rejects the options.
    pub fn new(
        document: &Document,
        container: HtmlElement,
        config: &FieldConfig,
    ) -> Result<Self, SessionError> {
        let type_control = Options::new()
            .set(
                "style",
                google::maps_enum("MapTypeControlStyle", "HORIZONTAL_BAR")?,
            )?
            .set("position", ControlPosition::TopRight.resolve()?)?
            .into_js();
        let options = Options::new()
            .set("center", lat_lng_literal(config.default_center)?)?
            .set("zoom", config.zoom)?
            .set("mapTypeId", config.map_type.as_str())?
            .set("disableDefaultUI", true)?
            .set("zoomControl", true)?
            .set("mapTypeControl", true)?
            .set("mapTypeControlOptions", type_control)?
            .into_js();

        let map = GoogleMap::new(&container, &options)?;
        tracing::trace!(input_id = %config.input_id, "map created");

        let mut surface = Self {
            map,
            container,
            document: document.clone(),
            input_id: config.input_id.clone(),
            marker_icon: config.marker_icon_url(),
            clear_icon: config.clear_polygon_icon.clone(),
            clear_button: None,
            locate_button: None,
        };

        let locate = controls::locate_button(
            document,
            &config.input_id,
            config.location_icon.as_deref(),
        )?;
        google::push_control(&surface.map, ControlPosition::RightBottom, &locate)?;
        surface.locate_button = Some(locate);

        Ok(surface)
    }

    pub fn map(&self) -> &GoogleMap {
        &self.map
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    pub fn clear_button(&self) -> Option<&HtmlButtonElement> {
        self.clear_button.as_ref()
    }

    pub fn locate_button(&self) -> Option<&HtmlButtonElement> {
        self.locate_button.as_ref()
    }

    pub fn set_zoom(&mut self, zoom: u8) {
        self.map.set_zoom(f64::from(zoom));
    }

    fn marker_options(&self, at: Coordinate) -> Result<JsValue, JsValue> {
        let icon = Options::new()
            .set("url", self.marker_icon.as_str())?
            .set("scaledSize", Size::new(MARKER_WIDTH, MARKER_HEIGHT))?
            .into_js();
        Ok(Options::new()
            .set("position", lat_lng_literal(at)?)?
            .set("map", JsValue::from(self.map.clone()))?
            .set("icon", icon)?
            .into_js())
    }

    fn polygon_options(&self) -> Result<JsValue, JsValue> {
        let style = PolygonStyle::default();
        Ok(Options::new()
            .set("strokeColor", style.stroke_color)?
            .set("strokeOpacity", style.stroke_opacity)?
            .set("strokeWeight", style.stroke_weight)?
            .set("fillColor", style.fill_color)?
            .set("fillOpacity", style.fill_opacity)?
            .set("editable", style.editable)?
            .set("map", JsValue::from(self.map.clone()))?
            .into_js())
    }

    fn set_crosshair_cursor(&self) -> Result<(), JsValue> {
        let options = Options::new()
            .set("draggableCursor", "crosshair")?
            .into_js();
        self.map.set_options(&options);
        Ok(())
    }

    fn build_clear_control(&self) -> Result<HtmlButtonElement, SessionError> {
        let button =
            controls::clear_button(&self.document, &self.input_id, self.clear_icon.as_deref())?;
        google::push_control(&self.map, ControlPosition::BottomLeft, &button)?;
        Ok(button)
    }
}

impl MapSurface for GoogleSurface {
    type Marker = Marker;
    type Polygon = GooglePolygon;

    fn set_center(&mut self, at: Coordinate) {
        match lat_lng_literal(at) {
            Ok(center) => self.map.set_center(&center),
            Err(err) => tracing::warn!(?err, "failed to build map center"),
        }
    }

    fn add_marker(&mut self, at: Coordinate) -> Marker {
        let options = self.marker_options(at).unwrap_or_else(|err| {
            // A marker without options is never attached to the map.
            tracing::warn!(?err, "failed to build marker options");
            Options::new().into_js()
        });
        Marker::new(&options)
    }

    fn remove_marker(&mut self, marker: Marker) {
        marker.set_map(&JsValue::NULL);
    }

    fn create_polygon(&mut self) -> GooglePolygon {
        if let Err(err) = self.set_crosshair_cursor() {
            tracing::warn!(?err, "failed to set polygon cursor");
        }
        let options = self.polygon_options().unwrap_or_else(|err| {
            tracing::warn!(?err, "failed to build polygon options");
            Options::new().into_js()
        });
        GooglePolygon {
            polygon: Polygon::new(&options),
        }
    }

    fn add_clear_control(&mut self, visible: bool) {
        match self.build_clear_control() {
            Ok(button) => {
                controls::set_visible(&button, visible);
                self.clear_button = Some(button);
            }
            Err(err) => {
                tracing::warn!(input_id = %self.input_id, error = %err, "clear control unavailable");
            }
        }
    }

    fn set_clear_control_visible(&mut self, visible: bool) {
        if let Some(button) = &self.clear_button {
            controls::set_visible(button, visible);
        }
    }
}

/// The editable polygon of a polygon-mode field.
pub struct GooglePolygon {
    polygon: Polygon,
}

impl PolygonOverlay for GooglePolygon {
    fn set_path(&mut self, path: &[Coordinate]) {
        let array = Array::new();
        for &at in path {
            match lat_lng_literal(at) {
                Ok(point) => {
                    array.push(&point);
                }
                Err(err) => tracing::warn!(?err, "failed to build polygon vertex"),
            }
        }
        self.polygon.set_path(&array);
    }

    fn path(&self) -> Vec<Coordinate> {
        let path = self.polygon.get_path();
        (0..path.get_length())
            .filter_map(|index| google::coordinate_of(&path.get_at(index)))
            .collect()
    }
}
