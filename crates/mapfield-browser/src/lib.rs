//! Browser layer for map location fields.
//!
//! Implements the `mapfield-core` platform traits over the Google Maps
//! JavaScript API and the DOM. It assumes a `wasm32-unknown-unknown` target
//! environment.
//!
//! # Architecture
//!
//! - `google`: extern bindings for the provider SDK
//! - `surface`: `MapSurface` / `PolygonOverlay` over a Google map
//! - `input`: `FieldInput` over the bound `<input>`
//! - `controls`: clear-polygon and go-to-my-location buttons
//! - `search`: optional place-search box
//! - `fields`: the page registry and session access
//! - `wiring`: provider and DOM events routed to sessions
//! - `loader`: one-time SDK load and boot
//!
//! # Re-exports
//!
//! This crate re-exports `mapfield-core` for convenience, so consumers
//! only need to depend on `mapfield-browser`.

// Re-export core crate
pub use mapfield_core;
pub use mapfield_core::*;

pub mod controls;
pub mod error;
pub mod fields;
pub mod google;
pub mod input;
pub mod loader;
pub mod search;
pub mod surface;
pub mod wiring;

pub use error::{LoaderError, SessionError};
pub use fields::{BrowserRegistry, BrowserSession, MapFields, ScanReport, page_fields};
pub use input::DomInput;
pub use loader::{boot, load_provider_once, ready_signal};
pub use surface::{GooglePolygon, GoogleSurface};

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

/// Look up an element by id and require it to be an `HtmlElement`.
pub fn find_html_element(document: &Document, id: &str) -> Result<HtmlElement, SessionError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| SessionError::MissingElement(SmolStr::new(id)))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| SessionError::WrongElement {
            id: SmolStr::new(id),
            expected: "an HTML element",
        })
}
