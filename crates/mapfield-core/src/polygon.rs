//! Multi-vertex interaction mode.
//!
//! The bound input text is authoritative. Every edit path writes the text
//! first and then re-derives the overlay from it (clicks), or reads the
//! overlay and writes the text in the same turn (drag edits, clear), so the
//! overlay path and the stored value never diverge.

use crate::coords::{Coordinate, format_point, format_polygon, parse_polygon};
use crate::platform::{FieldInput, MapSurface, PolygonOverlay};

/// Owns the polygon overlay of a polygon-mode session.
#[derive(Debug)]
pub struct PolygonController<P> {
    overlay: P,
}

impl<P: PolygonOverlay> PolygonController<P> {
    /// Create the overlay and clear control, then paint any stored polygon.
    ///
    /// The clear control starts hidden and is shown once stored vertices
    /// are painted.
    pub fn initialize<S, I>(surface: &mut S, input: &mut I) -> Self
    where
        S: MapSurface<Polygon = P>,
        I: FieldInput,
    {
        surface.add_clear_control(false);
        let overlay = surface.create_polygon();

        let mut controller = Self { overlay };
        controller.paint_from_input(surface, &*input);
        controller
    }

    pub fn overlay(&self) -> &P {
        &self.overlay
    }

    /// Append the clicked vertex to the stored text and repaint from it.
    ///
    /// A click without coordinate data is ignored.
    pub fn on_click<S, I>(&mut self, surface: &mut S, input: &mut I, at: Option<Coordinate>)
    where
        S: MapSurface<Polygon = P>,
        I: FieldInput,
    {
        let Some(at) = at else {
            tracing::debug!("map click without coordinates ignored");
            return;
        };

        let mut text = input.value();
        text.push(' ');
        text.push_str(&format_point(&at));
        input.set_value(text.trim());
        tracing::trace!(%at, "polygon vertex appended");

        self.paint_from_input(surface, &*input);
    }

    /// Copy the overlay's current path (after a user drag) into the input.
    pub fn on_overlay_edited<I: FieldInput>(&mut self, input: &mut I) {
        let path = self.overlay.path();
        let text = format_polygon(&path);
        tracing::trace!(vertices = path.len(), "polygon path edited");
        input.set_value(text.trim());
    }

    /// Empty the overlay and the input, and hide the clear control.
    pub fn clear<S, I>(&mut self, surface: &mut S, input: &mut I)
    where
        S: MapSurface<Polygon = P>,
        I: FieldInput,
    {
        self.overlay.set_path(&[]);
        input.set_value("");
        surface.set_clear_control_visible(false);
        tracing::trace!("polygon cleared");
    }

    /// Re-derive the overlay path from the input text.
    ///
    /// Unparseable text leaves the overlay as it was.
    pub fn paint_from_input<S, I>(&mut self, surface: &mut S, input: &I)
    where
        S: MapSurface<Polygon = P>,
        I: FieldInput,
    {
        let text = input.value();
        match parse_polygon(&text) {
            Ok(vertices) => {
                self.overlay.set_path(&vertices);
                surface.set_clear_control_visible(!vertices.is_empty());
            }
            Err(err) => {
                tracing::debug!(value = %text, error = %err, "ignoring unparseable polygon value");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingSurface;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn test_click_append() {
        let mut surface = RecordingSurface::default();
        let mut input = String::new();
        let mut ctrl = PolygonController::initialize(&mut surface, &mut input);
        assert_eq!(surface.clear_control, Some(false));

        ctrl.on_click(&mut surface, &mut input, Some(c(1.0, 2.0)));
        ctrl.on_click(&mut surface, &mut input, Some(c(3.0, 4.0)));

        assert_eq!(input, "1,2 3,4");
        assert_eq!(ctrl.overlay().path(), vec![c(1.0, 2.0), c(3.0, 4.0)]);
        assert_eq!(surface.clear_control, Some(true));
    }

    #[test]
    fn test_clear() {
        let mut surface = RecordingSurface::default();
        let mut input = "1,2 3,4".to_string();
        let mut ctrl = PolygonController::initialize(&mut surface, &mut input);
        assert_eq!(surface.clear_control, Some(true));

        ctrl.clear(&mut surface, &mut input);
        assert_eq!(input, "");
        assert!(ctrl.overlay().path().is_empty());
        assert_eq!(surface.clear_control, Some(false));
    }

    #[test]
    fn test_initialize_paints_stored_polygon() {
        let mut surface = RecordingSurface::default();
        let mut input = "1,2 3,4 5,6".to_string();
        let ctrl = PolygonController::initialize(&mut surface, &mut input);

        assert_eq!(
            ctrl.overlay().path(),
            vec![c(1.0, 2.0), c(3.0, 4.0), c(5.0, 6.0)]
        );
        assert_eq!(surface.polygons_created, 1);
    }

    #[test]
    fn test_initialize_malformed_leaves_overlay_pathless() {
        let mut surface = RecordingSurface::default();
        let mut input = "not,valid".to_string();
        let ctrl = PolygonController::initialize(&mut surface, &mut input);

        assert!(ctrl.overlay().path().is_empty());
        assert_eq!(surface.clear_control, Some(false));
        assert_eq!(input, "not,valid");
    }

    #[test]
    fn test_paint_failure_keeps_previous_path() {
        let mut surface = RecordingSurface::default();
        let mut input = "1,2 3,4".to_string();
        let mut ctrl = PolygonController::initialize(&mut surface, &mut input);

        input = "1,2 garbage".to_string();
        ctrl.paint_from_input(&mut surface, &input);
        assert_eq!(ctrl.overlay().path(), vec![c(1.0, 2.0), c(3.0, 4.0)]);
    }

    #[test]
    fn test_drag_edit_updates_input() {
        let mut surface = RecordingSurface::default();
        let mut input = "1,2 3,4".to_string();
        let mut ctrl = PolygonController::initialize(&mut surface, &mut input);

        surface.drag_path(vec![c(1.0, 2.0), c(3.0, 4.0), c(5.0, 6.0)]);
        ctrl.on_overlay_edited(&mut input);
        assert_eq!(input, "1,2 3,4 5,6");
    }

    #[test]
    fn test_click_without_coordinates_is_ignored() {
        let mut surface = RecordingSurface::default();
        let mut input = "1,2".to_string();
        let mut ctrl = PolygonController::initialize(&mut surface, &mut input);

        ctrl.on_click(&mut surface, &mut input, None);
        assert_eq!(input, "1,2");
        assert_eq!(ctrl.overlay().path(), vec![c(1.0, 2.0)]);
    }

    #[test]
    fn test_degenerate_polygons_are_drawn() {
        let mut surface = RecordingSurface::default();
        let mut input = String::new();
        let mut ctrl = PolygonController::initialize(&mut surface, &mut input);

        ctrl.on_click(&mut surface, &mut input, Some(c(1.0, 2.0)));
        assert_eq!(input, "1,2");
        assert_eq!(ctrl.overlay().path().len(), 1);
    }
}
