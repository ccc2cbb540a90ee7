//! Platform abstraction traits for map field operations.
//!
//! These traits define the interface between the controller logic and the
//! mapping provider / DOM implementation. The browser crate implements them
//! over the Google Maps SDK and an `HtmlInputElement`; tests implement them
//! with in-memory recorders.

use crate::coords::Coordinate;

/// Visual style of the editable polygon overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonStyle {
    pub stroke_color: &'static str,
    pub stroke_opacity: f64,
    pub stroke_weight: u32,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    pub editable: bool,
}

impl Default for PolygonStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#FF0000",
            stroke_opacity: 0.8,
            stroke_weight: 2,
            fill_color: "#FF0000",
            fill_opacity: 0.35,
            editable: true,
        }
    }
}

/// The drawable polygon object bound to a session.
///
/// Created once per polygon-mode session and mutated in place.
pub trait PolygonOverlay {
    /// Replace the overlay path. An empty slice leaves the overlay pathless.
    fn set_path(&mut self, path: &[Coordinate]);

    /// Read the overlay's current path, including any user drag edits.
    fn path(&self) -> Vec<Coordinate>;
}

/// A live map instance owned by one session.
pub trait MapSurface {
    /// Handle to a marker placed on the map.
    type Marker;
    /// Polygon overlay attached to the map.
    type Polygon: PolygonOverlay;

    /// Move the map viewport to `at`.
    fn set_center(&mut self, at: Coordinate);

    /// Create a marker at `at` and attach it to the map.
    fn add_marker(&mut self, at: Coordinate) -> Self::Marker;

    /// Detach a marker from the map.
    fn remove_marker(&mut self, marker: Self::Marker);

    /// Create the polygon overlay. Called at most once per session.
    fn create_polygon(&mut self) -> Self::Polygon;

    /// Create the clear-polygon control. Called at most once per session.
    fn add_clear_control(&mut self, visible: bool);

    /// Show or hide the clear-polygon control, if one exists.
    fn set_clear_control_visible(&mut self, visible: bool);
}

/// The text input a session writes its value to.
///
/// The session only holds a reference; it never owns the element's lifecycle.
pub trait FieldInput {
    fn value(&self) -> String;

    fn set_value(&mut self, value: &str);
}

impl FieldInput for String {
    fn value(&self) -> String {
        self.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.clear();
        self.push_str(value);
    }
}
