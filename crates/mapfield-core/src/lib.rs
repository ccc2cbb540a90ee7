//! mapfield-core: map location field logic without browser dependencies.
//!
//! This crate provides:
//! - `coords`: coordinate pair and polygon text codec
//! - `MarkerController` / `PolygonController` - generic over `MapSurface`
//! - `MapSession` and `SessionRegistry` - per-field state and page-wide routing
//! - `render_field` - server-side field markup
//!
//! The browser binding lives in `mapfield-browser`, which implements the
//! `platform` traits against the mapping provider and the DOM.

pub mod config;
pub mod coords;
pub mod marker;
pub mod platform;
pub mod polygon;
pub mod ready;
pub mod registry;
pub mod render;
pub mod session;

#[cfg(test)]
mod test_support;

pub use config::{
    ConfigError, DEFAULT_CENTER, DEFAULT_ZOOM, FieldConfig, FieldKeys, InteractionMode, MapType,
    ProviderSettings, READY_CALLBACK, READY_SETTLE_DELAY, SETTLE_DELAY, marker_icon_url,
};
pub use coords::{
    CoordError, Coordinate, format_point, format_polygon, parse_point, parse_polygon,
};
pub use marker::{MarkerController, MarkerState};
pub use platform::{FieldInput, MapSurface, PolygonOverlay, PolygonStyle};
pub use polygon::PolygonController;
pub use ready::{ReadyFuture, ReadySignal};
pub use registry::{Registration, SessionRegistry};
pub use render::{FieldFlags, FieldRender, RenderError, Viewer, render_field, sanitize_value};
pub use session::{MapEvent, MapSession};
pub use smol_str::SmolStr;
