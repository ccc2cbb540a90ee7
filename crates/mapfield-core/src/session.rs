//! Per-field map session.
//!
//! A session bundles one field's map surface, its bound input, and the
//! controller for its interaction mode. It is built once, when the provider
//! is ready, and lives until the page goes away.

use smol_str::SmolStr;

use crate::config::{FieldConfig, InteractionMode};
use crate::coords::Coordinate;
use crate::marker::MarkerController;
use crate::platform::{FieldInput, MapSurface, PolygonOverlay};
use crate::polygon::PolygonController;

/// An interaction delivered to a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MapEvent {
    /// The map was clicked. `None` when the provider event carried no
    /// coordinate data.
    Click(Option<Coordinate>),
    /// The user finished dragging the overlay and the settle delay elapsed.
    OverlayEdited,
    /// The clear control (or host code) asked for the value to be removed.
    Clear,
}

/// One live map field.
pub struct MapSession<S: MapSurface, I> {
    config: FieldConfig,
    surface: S,
    input: I,
    marker: MarkerController<S::Marker>,
    polygon: Option<PolygonController<S::Polygon>>,
}

impl<S, I> MapSession<S, I>
where
    S: MapSurface,
    I: FieldInput,
{
    /// Seed a new session from the input's current text.
    ///
    /// The input is read here and nowhere else; afterwards it only receives
    /// writes.
    pub fn initialize(config: FieldConfig, mut surface: S, mut input: I) -> Self {
        let mut marker = MarkerController::new();
        let polygon = match config.mode {
            InteractionMode::Marker => {
                marker.initialize(&mut surface, &mut input, config.default_center);
                None
            }
            InteractionMode::Polygon => {
                let polygon = PolygonController::initialize(&mut surface, &mut input);
                // Open on the stored area, if any.
                let center = polygon.overlay().path().first().copied();
                surface.set_center(center.unwrap_or(config.default_center));
                Some(polygon)
            }
        };

        tracing::debug!(input_id = %config.input_id, mode = ?config.mode, "map session initialized");

        Self {
            config,
            surface,
            input,
            marker,
            polygon,
        }
    }

    pub fn input_id(&self) -> &SmolStr {
        &self.config.input_id
    }

    pub fn mode(&self) -> InteractionMode {
        self.config.mode
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn marker(&self) -> &MarkerController<S::Marker> {
        &self.marker
    }

    pub fn polygon(&self) -> Option<&PolygonController<S::Polygon>> {
        self.polygon.as_ref()
    }

    /// Current stored text of the bound input.
    pub fn value(&self) -> String {
        self.input.value()
    }

    pub fn handle(&mut self, event: MapEvent) {
        match event {
            MapEvent::Click(at) => self.on_click(at),
            MapEvent::OverlayEdited => self.on_overlay_edited(),
            MapEvent::Clear => self.clear(),
        }
    }

    pub fn on_click(&mut self, at: Option<Coordinate>) {
        match &mut self.polygon {
            Some(polygon) => polygon.on_click(&mut self.surface, &mut self.input, at),
            None => self.marker.on_click(&mut self.surface, &mut self.input, at),
        }
    }

    /// Pull a drag-edited overlay path into the input. No-op in marker mode.
    pub fn on_overlay_edited(&mut self) {
        if let Some(polygon) = &mut self.polygon {
            polygon.on_overlay_edited(&mut self.input);
        }
    }

    /// Remove the selection from both the map and the input.
    pub fn clear(&mut self) {
        if let Some(polygon) = &mut self.polygon {
            polygon.clear(&mut self.surface, &mut self.input);
        } else {
            self.input.set_value("");
        }
        // Also drop any marker, whatever the mode.
        self.marker.clear(&mut self.surface);
    }

    /// Move the viewport, e.g. after a search or geolocation lookup.
    pub fn recenter(&mut self, at: Coordinate) {
        self.surface.set_center(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldKeys;
    use crate::test_support::RecordingSurface;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn config(mode: InteractionMode) -> FieldConfig {
        FieldConfig {
            mode,
            ..FieldConfig::for_field(FieldKeys::new(1, 3))
        }
    }

    #[test]
    fn test_marker_session_click() {
        let mut session = MapSession::initialize(
            config(InteractionMode::Marker),
            RecordingSurface::default(),
            String::new(),
        );
        assert_eq!(session.surface().center, Some(config(InteractionMode::Marker).default_center));

        session.handle(MapEvent::Click(Some(c(1.0, 2.0))));
        session.handle(MapEvent::Click(Some(c(3.0, 4.0))));
        assert_eq!(session.value(), "3,4");
        assert_eq!(session.surface().live_markers(), vec![c(3.0, 4.0)]);
        assert!(session.polygon().is_none());
    }

    #[test]
    fn test_marker_session_ignores_overlay_edit() {
        let mut session = MapSession::initialize(
            config(InteractionMode::Marker),
            RecordingSurface::default(),
            "1,2".to_string(),
        );
        session.handle(MapEvent::OverlayEdited);
        assert_eq!(session.value(), "1,2");
        assert_eq!(session.surface().polygons_created, 0);
    }

    #[test]
    fn test_marker_session_clear() {
        let mut session = MapSession::initialize(
            config(InteractionMode::Marker),
            RecordingSurface::default(),
            "1,2".to_string(),
        );
        assert!(session.marker().is_placed());

        session.handle(MapEvent::Clear);
        assert_eq!(session.value(), "");
        assert!(!session.marker().is_placed());
        assert!(session.surface().live_markers().is_empty());
    }

    #[test]
    fn test_polygon_session_flow() {
        let mut session = MapSession::initialize(
            config(InteractionMode::Polygon),
            RecordingSurface::default(),
            String::new(),
        );

        session.handle(MapEvent::Click(Some(c(1.0, 2.0))));
        session.handle(MapEvent::Click(Some(c(3.0, 4.0))));
        assert_eq!(session.value(), "1,2 3,4");

        session.surface_mut().drag_path(vec![c(1.0, 2.0), c(3.0, 4.0), c(5.0, 6.0)]);
        session.handle(MapEvent::OverlayEdited);
        assert_eq!(session.value(), "1,2 3,4 5,6");

        session.handle(MapEvent::Clear);
        assert_eq!(session.value(), "");
        assert!(session.polygon().unwrap().overlay().path().is_empty());
        assert_eq!(session.surface().clear_control, Some(false));
        // Polygon sessions never place markers.
        assert_eq!(session.surface().added_markers, 0);
    }

    #[test]
    fn test_polygon_session_opens_on_stored_area() {
        let stored = MapSession::initialize(
            config(InteractionMode::Polygon),
            RecordingSurface::default(),
            "10,20 11,21 12,20".to_string(),
        );
        assert_eq!(stored.surface().center, Some(c(10.0, 20.0)));
        assert_eq!(stored.surface().clear_control, Some(true));

        let empty = MapSession::initialize(
            config(InteractionMode::Polygon),
            RecordingSurface::default(),
            String::new(),
        );
        assert_eq!(empty.surface().center, Some(config(InteractionMode::Polygon).default_center));
    }

    #[test]
    fn test_malformed_initial_values() {
        let marker = MapSession::initialize(
            config(InteractionMode::Marker),
            RecordingSurface::default(),
            "not,valid".to_string(),
        );
        assert!(!marker.marker().is_placed());

        let polygon = MapSession::initialize(
            config(InteractionMode::Polygon),
            RecordingSurface::default(),
            "not,valid".to_string(),
        );
        assert!(polygon.polygon().unwrap().overlay().path().is_empty());
        assert_eq!(polygon.surface().center, Some(config(InteractionMode::Polygon).default_center));
    }
}
