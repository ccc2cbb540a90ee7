//! In-memory `MapSurface` used by the controller and session tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::coords::Coordinate;
use crate::platform::{MapSurface, PolygonOverlay};

#[derive(Clone, Debug, Default)]
pub struct RecordingPolygon {
    path: Rc<RefCell<Vec<Coordinate>>>,
}

impl PolygonOverlay for RecordingPolygon {
    fn set_path(&mut self, path: &[Coordinate]) {
        *self.path.borrow_mut() = path.to_vec();
    }

    fn path(&self) -> Vec<Coordinate> {
        self.path.borrow().clone()
    }
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub center: Option<Coordinate>,
    pub added_markers: usize,
    pub removed_markers: usize,
    pub polygons_created: usize,
    /// `None` until a clear control exists, then its visibility.
    pub clear_control: Option<bool>,
    markers: BTreeMap<usize, Coordinate>,
    polygon: Option<RecordingPolygon>,
}

impl RecordingSurface {
    pub fn live_markers(&self) -> Vec<Coordinate> {
        self.markers.values().copied().collect()
    }

    /// Mutate the overlay path behind the controller's back, the way a user
    /// dragging a vertex does.
    pub fn drag_path(&mut self, path: Vec<Coordinate>) {
        if let Some(polygon) = &self.polygon {
            *polygon.path.borrow_mut() = path;
        }
    }
}

impl MapSurface for RecordingSurface {
    type Marker = usize;
    type Polygon = RecordingPolygon;

    fn set_center(&mut self, at: Coordinate) {
        self.center = Some(at);
    }

    fn add_marker(&mut self, at: Coordinate) -> usize {
        let id = self.added_markers;
        self.added_markers += 1;
        self.markers.insert(id, at);
        id
    }

    fn remove_marker(&mut self, marker: usize) {
        if self.markers.remove(&marker).is_some() {
            self.removed_markers += 1;
        }
    }

    fn create_polygon(&mut self) -> RecordingPolygon {
        self.polygons_created += 1;
        let polygon = RecordingPolygon::default();
        self.polygon = Some(polygon.clone());
        polygon
    }

    fn add_clear_control(&mut self, visible: bool) {
        self.clear_control = Some(visible);
    }

    fn set_clear_control_visible(&mut self, visible: bool) {
        if self.clear_control.is_some() {
            self.clear_control = Some(visible);
        }
    }
}
