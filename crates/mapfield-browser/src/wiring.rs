//! Route provider and DOM events of a live field to its session.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use mapfield_core::{InteractionMode, MapEvent, SETTLE_DELAY, SmolStr};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::controls;
use crate::error::SessionError;
use crate::fields::MapFields;
use crate::google::{self, MapMouseEvent, MapsEventListener};
use crate::search::{SEARCH_ZOOM, SearchBox};

/// Listeners owned by one session. Dropping this detaches them.
pub struct SessionWiring {
    input_id: SmolStr,
    dom: Vec<EventListener>,
    _map_click: Closure<dyn FnMut(JsValue)>,
    map_click_handle: MapsEventListener,
    _search: Option<SearchBox>,
}

impl SessionWiring {
    pub fn input_id(&self) -> &SmolStr {
        &self.input_id
    }
}

impl Drop for SessionWiring {
    fn drop(&mut self) {
        self.map_click_handle.remove();
        tracing::trace!(input_id = %self.input_id, listeners = self.dom.len(), "map listeners detached");
    }
}

/// Attach every listener a freshly initialized session needs.
pub fn wire_session(fields: &MapFields, input_id: &SmolStr) -> Result<SessionWiring, SessionError> {
    let parts = fields.with_session(input_id, |session| {
        let surface = session.surface();
        (
            session.config().clone(),
            surface.map().clone(),
            surface.container().clone(),
            surface.clear_button().cloned(),
            surface.locate_button().cloned(),
        )
    });
    let Some((config, map, container, clear_button, locate_button)) = parts else {
        return Err(SessionError::NotLive(input_id.clone()));
    };

    let map_click = {
        let fields = fields.clone();
        let input_id = input_id.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            let at = if event.is_object() {
                event
                    .unchecked_ref::<MapMouseEvent>()
                    .lat_lng()
                    .and_then(|lat_lng| google::coordinate_of(&lat_lng))
            } else {
                None
            };
            fields.dispatch(&input_id, MapEvent::Click(at));
        })
    };
    let map_click_handle = google::add_listener(&map, "click", map_click.as_ref().unchecked_ref());

    let mut dom = Vec::new();

    if config.mode == InteractionMode::Polygon {
        // Vertex drags end with a mouseup on the container; the overlay path
        // is only final a moment later. A newer mouseup replaces the pending
        // read.
        let fields = fields.clone();
        let input_id = input_id.clone();
        let pending: Rc<RefCell<Option<Timeout>>> = Rc::default();
        dom.push(EventListener::new(&container, "mouseup", move |_| {
            let fields = fields.clone();
            let input_id = input_id.clone();
            *pending.borrow_mut() = Some(Timeout::new(SETTLE_DELAY.as_millis() as u32, move || {
                fields.dispatch(&input_id, MapEvent::OverlayEdited);
            }));
        }));
    }

    if let Some(button) = clear_button {
        let fields = fields.clone();
        let input_id = input_id.clone();
        dom.push(EventListener::new(&button, "click", move |event| {
            event.prevent_default();
            tracing::trace!(%input_id, "clear control clicked");
            fields.dispatch(&input_id, MapEvent::Clear);
        }));
    }

    if let Some(button) = locate_button {
        let fields = fields.clone();
        let input_id = input_id.clone();
        dom.push(EventListener::new(&button, "click", move |event| {
            event.prevent_default();
            let fields = fields.clone();
            let input_id = input_id.clone();
            controls::locate_current_position(move |at| {
                fields.with_session(&input_id, |session| session.recenter(at));
            });
        }));
    }

    let search = if config.has_search() {
        let fields = fields.clone();
        let input_id = input_id.clone();
        let document = container.owner_document().ok_or(SessionError::NoDocument)?;
        let attached = SearchBox::attach(&document, &map, &config.autocomplete_types, move |at| {
            fields.with_session(&input_id, |session| {
                session.recenter(at);
                session.surface_mut().set_zoom(SEARCH_ZOOM);
            });
        });
        match attached {
            Ok(search) => Some(search),
            Err(err) => {
                tracing::warn!(input_id = %config.input_id, error = %err, "place search unavailable");
                None
            }
        }
    } else {
        None
    };

    tracing::trace!(%input_id, mode = ?config.mode, "map listeners attached");

    Ok(SessionWiring {
        input_id: input_id.clone(),
        dom,
        _map_click: map_click,
        map_click_handle,
        _search: search,
    })
}
