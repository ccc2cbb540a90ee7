//! Single-point interaction mode.
//!
//! The controller is a two-state machine: `Empty` or `Placed` with exactly one
//! live marker. Placing a new marker always removes the previous one first.

use crate::coords::{Coordinate, format_point, parse_point};
use crate::platform::{FieldInput, MapSurface};

/// Marker controller state.
#[derive(Debug)]
pub enum MarkerState<M> {
    Empty,
    Placed { marker: M, at: Coordinate },
}

impl<M> Default for MarkerState<M> {
    fn default() -> Self {
        MarkerState::Empty
    }
}

/// Owns the (at most one) marker of a session.
#[derive(Debug)]
pub struct MarkerController<M> {
    state: MarkerState<M>,
}

impl<M> Default for MarkerController<M> {
    fn default() -> Self {
        Self {
            state: MarkerState::Empty,
        }
    }
}

impl<M> MarkerController<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &MarkerState<M> {
        &self.state
    }

    /// Position of the live marker, if one is placed.
    pub fn position(&self) -> Option<Coordinate> {
        match &self.state {
            MarkerState::Placed { at, .. } => Some(*at),
            MarkerState::Empty => None,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self.state, MarkerState::Placed { .. })
    }

    /// Seed from the input's stored text.
    ///
    /// A valid point places a marker and centres the map on it; anything else
    /// leaves the controller empty and centres on `default_center`.
    pub fn initialize<S, I>(
        &mut self,
        surface: &mut S,
        input: &mut I,
        default_center: Coordinate,
    ) where
        S: MapSurface<Marker = M>,
        I: FieldInput,
    {
        let text = input.value();
        match parse_point(&text) {
            Ok(at) => {
                self.place_at(surface, input, at);
                surface.set_center(at);
            }
            Err(err) => {
                if !text.is_empty() {
                    tracing::debug!(value = %text, error = %err, "ignoring unparseable marker value");
                }
                surface.set_center(default_center);
            }
        }
    }

    /// Put the single marker at `at` and write the point to the input.
    pub fn place_at<S, I>(&mut self, surface: &mut S, input: &mut I, at: Coordinate)
    where
        S: MapSurface<Marker = M>,
        I: FieldInput,
    {
        self.remove(surface);
        let marker = surface.add_marker(at);
        self.state = MarkerState::Placed { marker, at };
        input.set_value(&format_point(&at));
        tracing::trace!(%at, "marker placed");
    }

    /// Remove the marker, if any. Leaves the input text alone.
    pub fn clear<S>(&mut self, surface: &mut S)
    where
        S: MapSurface<Marker = M>,
    {
        if self.remove(surface) {
            tracing::trace!("marker cleared");
        }
    }

    /// Handle a map click. A click without coordinate data is ignored.
    pub fn on_click<S, I>(&mut self, surface: &mut S, input: &mut I, at: Option<Coordinate>)
    where
        S: MapSurface<Marker = M>,
        I: FieldInput,
    {
        match at {
            Some(at) => self.place_at(surface, input, at),
            None => tracing::debug!("map click without coordinates ignored"),
        }
    }

    fn remove<S>(&mut self, surface: &mut S) -> bool
    where
        S: MapSurface<Marker = M>,
    {
        match std::mem::take(&mut self.state) {
            MarkerState::Placed { marker, .. } => {
                surface.remove_marker(marker);
                true
            }
            MarkerState::Empty => false,
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
    fn test_place_writes_input() {
        let mut surface = RecordingSurface::default();
        let mut input = String::new();
        let mut ctrl = MarkerController::new();

        ctrl.place_at(&mut surface, &mut input, c(1.0, 2.0));
        assert_eq!(input, "1,2");
        assert_eq!(ctrl.position(), Some(c(1.0, 2.0)));
        assert_eq!(surface.live_markers(), vec![c(1.0, 2.0)]);
    }

    #[test]
    fn test_replacement_keeps_one_marker() {
        let mut surface = RecordingSurface::default();
        let mut input = String::new();
        let mut ctrl = MarkerController::new();

        ctrl.place_at(&mut surface, &mut input, c(1.0, 2.0));
        ctrl.place_at(&mut surface, &mut input, c(-3.5, 4.25));

        assert_eq!(surface.live_markers(), vec![c(-3.5, 4.25)]);
        assert_eq!(surface.removed_markers, 1);
        assert_eq!(input, "-3.5,4.25");
    }

    #[test]
    fn test_clear_twice_is_harmless() {
        let mut surface = RecordingSurface::default();
        let mut ctrl: MarkerController<usize> = MarkerController::new();

        ctrl.clear(&mut surface);
        ctrl.clear(&mut surface);
        assert!(!ctrl.is_placed());
        assert_eq!(surface.removed_markers, 0);
    }

    #[test]
    fn test_clear_keeps_input_text() {
        let mut surface = RecordingSurface::default();
        let mut input = String::new();
        let mut ctrl = MarkerController::new();

        ctrl.place_at(&mut surface, &mut input, c(1.0, 2.0));
        ctrl.clear(&mut surface);
        assert!(!ctrl.is_placed());
        assert!(surface.live_markers().is_empty());
        assert_eq!(input, "1,2");
    }

    #[test]
    fn test_click_without_coordinates_is_ignored() {
        let mut surface = RecordingSurface::default();
        let mut input = "5,6".to_string();
        let mut ctrl = MarkerController::new();

        ctrl.on_click(&mut surface, &mut input, None);
        assert!(!ctrl.is_placed());
        assert_eq!(input, "5,6");
        assert_eq!(surface.added_markers, 0);
    }

    #[test]
    fn test_initialize_from_valid_value() {
        let mut surface = RecordingSurface::default();
        let mut input = "10.5,-20.25".to_string();
        let mut ctrl = MarkerController::new();

        ctrl.initialize(&mut surface, &mut input, c(0.0, 0.0));
        assert_eq!(ctrl.position(), Some(c(10.5, -20.25)));
        assert_eq!(surface.center, Some(c(10.5, -20.25)));
    }

    #[test]
    fn test_initialize_from_malformed_value() {
        let mut surface = RecordingSurface::default();
        let mut input = "not,valid".to_string();
        let mut ctrl: MarkerController<usize> = MarkerController::new();

        ctrl.initialize(&mut surface, &mut input, c(-34.397, 150.644));
        assert!(!ctrl.is_placed());
        assert_eq!(surface.center, Some(c(-34.397, 150.644)));
        assert_eq!(input, "not,valid");
    }
}
