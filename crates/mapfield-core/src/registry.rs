//! Page-wide registry of map field sessions.
//!
//! Fields register their configuration while the page is being built. Once
//! the provider is ready, [`SessionRegistry::initialize_all`] turns every
//! pending registration into a live [`MapSession`]. Each field is initialized
//! at most once; a failure for one field is logged and does not affect the
//! others.

use std::fmt::Display;

use smol_str::SmolStr;

use crate::config::FieldConfig;
use crate::platform::{FieldInput, MapSurface};
use crate::session::{MapEvent, MapSession};

enum Slot<S: MapSurface, I> {
    Pending,
    Live(Box<MapSession<S, I>>),
    Failed,
}

struct Entry<S: MapSurface, I> {
    config: FieldConfig,
    slot: Slot<S, I>,
}

/// Outcome of [`SessionRegistry::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// First registration for this input id.
    Added,
    /// The field was registered before and is still pending; its config was
    /// replaced.
    Replaced,
    /// The field already has a map; the new config was ignored.
    AlreadyLive,
}

/// Sessions keyed by input id, in registration order.
pub struct SessionRegistry<S: MapSurface, I> {
    entries: Vec<Entry<S, I>>,
}

impl<S: MapSurface, I> Default for SessionRegistry<S, I> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S, I> SessionRegistry<S, I>
where
    S: MapSurface,
    I: FieldInput,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, input_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.config.input_id == input_id)
    }

    /// Record a field's configuration. No map is created yet.
    pub fn register(&mut self, config: FieldConfig) -> Registration {
        match self.position(&config.input_id) {
            None => {
                tracing::trace!(input_id = %config.input_id, "map field registered");
                self.entries.push(Entry {
                    config,
                    slot: Slot::Pending,
                });
                Registration::Added
            }
            Some(idx) => {
                let entry = &mut self.entries[idx];
                if let Slot::Live(_) = entry.slot {
                    tracing::debug!(input_id = %config.input_id, "field already live, registration ignored");
                    return Registration::AlreadyLive;
                }
                entry.config = config;
                entry.slot = Slot::Pending;
                Registration::Replaced
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Input ids in registration order.
    pub fn input_ids(&self) -> impl Iterator<Item = &SmolStr> {
        self.entries.iter().map(|e| &e.config.input_id)
    }

    pub fn config(&self, input_id: &str) -> Option<&FieldConfig> {
        self.position(input_id).map(|idx| &self.entries[idx].config)
    }

    /// Whether any registered field wants the place-search box.
    pub fn needs_search(&self) -> bool {
        self.entries.iter().any(|e| e.config.has_search())
    }

    /// Number of fields still waiting for their map.
    pub fn pending(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.slot, Slot::Pending))
            .count()
    }

    /// Build a session for every pending field.
    ///
    /// `create` produces the map surface and bound input for a config. An
    /// error is logged, the field is marked failed, and the loop moves on.
    /// Returns the ids of the sessions created by this call.
    pub fn initialize_all<F, E>(&mut self, mut create: F) -> Vec<SmolStr>
    where
        F: FnMut(&FieldConfig) -> Result<(S, I), E>,
        E: Display,
    {
        let mut created = Vec::new();
        for entry in &mut self.entries {
            if !matches!(entry.slot, Slot::Pending) {
                continue;
            }
            match create(&entry.config) {
                Ok((surface, input)) => {
                    let session = MapSession::initialize(entry.config.clone(), surface, input);
                    entry.slot = Slot::Live(Box::new(session));
                    created.push(entry.config.input_id.clone());
                }
                Err(err) => {
                    tracing::warn!(input_id = %entry.config.input_id, error = %err, "map field failed to initialize");
                    entry.slot = Slot::Failed;
                }
            }
        }
        created
    }

    pub fn get(&self, input_id: &str) -> Option<&MapSession<S, I>> {
        match &self.entries[self.position(input_id)?].slot {
            Slot::Live(session) => Some(session.as_ref()),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, input_id: &str) -> Option<&mut MapSession<S, I>> {
        let idx = self.position(input_id)?;
        match &mut self.entries[idx].slot {
            Slot::Live(session) => Some(session.as_mut()),
            _ => None,
        }
    }

    /// Route an event to a live session. Returns `false` when the field has
    /// no live map.
    pub fn dispatch(&mut self, input_id: &str, event: MapEvent) -> bool {
        match self.get_mut(input_id) {
            Some(session) => {
                session.handle(event);
                true
            }
            None => {
                tracing::debug!(input_id, ?event, "event for field without a live map dropped");
                false
            }
        }
    }
}
