//! The page's map fields.
//!
//! One registry per page holds every registered field. Provider callbacks and
//! DOM listeners reach their session through [`MapFields`], keyed by input id.

use std::cell::RefCell;
use std::rc::Rc;

use mapfield_core::render::CONFIG_ATTRIBUTE;
use mapfield_core::{
    FieldConfig, MapEvent, MapSession, Registration, SessionRegistry, SmolStr,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::error::SessionError;
use crate::input::DomInput;
use crate::surface::GoogleSurface;
use crate::wiring::{self, SessionWiring};

pub type BrowserSession = MapSession<GoogleSurface, DomInput>;
pub type BrowserRegistry = SessionRegistry<GoogleSurface, DomInput>;

/// Shared handle to the page registry.
#[derive(Clone, Default)]
pub struct MapFields {
    registry: Rc<RefCell<BrowserRegistry>>,
    wiring: Rc<RefCell<Vec<SessionWiring>>>,
}

/// Outcome of [`MapFields::register_from_document`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub registered: usize,
    /// Elements whose embedded configuration did not parse.
    pub skipped: usize,
}

thread_local! {
    static PAGE_FIELDS: MapFields = MapFields::default();
}

/// The registry shared by everything on this page.
pub fn page_fields() -> MapFields {
    PAGE_FIELDS.with(MapFields::clone)
}

impl MapFields {
    pub fn register(&self, config: FieldConfig) -> Option<Registration> {
        match self.registry.try_borrow_mut() {
            Ok(mut registry) => Some(registry.register(config)),
            Err(_) => {
                tracing::warn!(input_id = %config.input_id, "registry busy, field not registered");
                None
            }
        }
    }

    /// Register every field whose markup carries an embedded configuration.
    pub fn register_from_document(&self, document: &Document) -> ScanReport {
        let mut report = ScanReport::default();
        let nodes = match document.query_selector_all(&format!("[{CONFIG_ATTRIBUTE}]")) {
            Ok(nodes) => nodes,
            Err(err) => {
                tracing::warn!(?err, "map field scan failed");
                return report;
            }
        };

        for index in 0..nodes.length() {
            let Some(element) = nodes.item(index).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(json) = element.get_attribute(CONFIG_ATTRIBUTE) else {
                continue;
            };
            match FieldConfig::from_json(&json) {
                Ok(config) => {
                    if self.register(config).is_some() {
                        report.registered += 1;
                    }
                }
                Err(err) => {
                    tracing::warn!(element_id = %element.id(), error = %err, "skipping map field with bad configuration");
                    report.skipped += 1;
                }
            }
        }
        report
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.borrow().is_empty()
    }

    /// Whether the provider must be loaded with the places library.
    pub fn needs_search(&self) -> bool {
        self.registry.borrow().needs_search()
    }

    pub fn pending(&self) -> usize {
        self.registry.borrow().pending()
    }

    /// Run `f` against a live session.
    ///
    /// Returns `None` if the field has no live map or the registry is
    /// already in use further up the stack.
    pub fn with_session<R>(
        &self,
        input_id: &str,
        f: impl FnOnce(&mut BrowserSession) -> R,
    ) -> Option<R> {
        let Ok(mut registry) = self.registry.try_borrow_mut() else {
            tracing::warn!(input_id, "registry busy, session access dropped");
            return None;
        };
        registry.get_mut(input_id).map(f)
    }

    pub fn dispatch(&self, input_id: &str, event: MapEvent) -> bool {
        let Ok(mut registry) = self.registry.try_borrow_mut() else {
            tracing::warn!(input_id, ?event, "registry busy, event dropped");
            return false;
        };
        registry.dispatch(input_id, event)
    }

    /// Current stored value of a live field.
    pub fn value(&self, input_id: &str) -> Option<String> {
        self.with_session(input_id, |session| session.value())
    }

    /// Create and wire a map for every pending field. Returns how many came
    /// up.
    pub fn initialize_pending(&self) -> usize {
        let created = {
            let Ok(mut registry) = self.registry.try_borrow_mut() else {
                tracing::warn!("registry busy, initialization skipped");
                return 0;
            };
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                tracing::warn!(error = %SessionError::NoDocument, "maps not initialized");
                return 0;
            };
            registry.initialize_all(|config| create_parts(&document, config))
        };

        for input_id in &created {
            match wiring::wire_session(self, input_id) {
                Ok(wired) => self.wiring.borrow_mut().push(wired),
                Err(err) => tracing::warn!(%input_id, error = %err, "map listeners not attached"),
            }
        }
        tracing::debug!(count = created.len(), "map fields initialized");
        created.len()
    }

    pub fn input_ids(&self) -> Vec<SmolStr> {
        self.registry.borrow().input_ids().cloned().collect()
    }
}

fn create_parts(
    document: &Document,
    config: &FieldConfig,
) -> Result<(GoogleSurface, DomInput), SessionError> {
    let input = DomInput::find(document, &config.input_id)?;
    let container = crate::find_html_element(document, &config.container_id)?;
    let surface = GoogleSurface::new(document, container, config)?;
    Ok((surface, input))
}
