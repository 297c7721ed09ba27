use alloc::{string::String, vec::Vec};

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use triomphe::Arc;

use crate::{ConsoleError, Panel, lock::Lock};

/// The panels of a console by name, in registration order.
#[derive(Default)]
pub struct PanelRegistry {
    panels: Lock<IndexMap<String, Arc<Panel>, FxBuildHasher>>,
}

impl PanelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `name` with `panel`, replacing any panel registered under
    /// that name. A replaced panel keeps its position.
    pub fn register(&self, name: impl Into<String>, panel: Panel) -> Arc<Panel> {
        let panel = Arc::new(panel);
        self.panels.write().insert(name.into(), panel.clone());
        panel
    }

    /// The panel registered under `name`.
    ///
    /// # Errors
    ///
    /// Fails with [`ConsoleError::UnknownPanel`] when no panel has that name.
    pub fn get(&self, name: &str) -> Result<Arc<Panel>, ConsoleError> {
        self.panels
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ConsoleError::UnknownPanel { name: name.into() })
    }

    /// The panel registered under `name`, registering the one made by
    /// `make` first if there is none.
    pub fn get_or_register(&self, name: &str, make: impl FnOnce() -> Panel) -> Arc<Panel> {
        if let Some(panel) = self.panels.read().get(name) {
            return panel.clone();
        }
        self.panels
            .write()
            .entry(name.into())
            .or_insert_with(|| Arc::new(make()))
            .clone()
    }

    /// Whether a panel is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.panels.read().contains_key(name)
    }

    /// All panels with their names, in registration order.
    pub fn panels(&self) -> Vec<(String, Arc<Panel>)> {
        self.panels
            .read()
            .iter()
            .map(|(name, panel)| (name.clone(), panel.clone()))
            .collect()
    }

    /// The panels that get a tab, in registration order.
    pub fn visible_panels(&self) -> Vec<(String, Arc<Panel>)> {
        let mut panels = self.panels();
        panels.retain(|(_, panel)| panel.is_visible());
        panels
    }

    /// Number of registered panels.
    pub fn len(&self) -> usize {
        self.panels.read().len()
    }

    /// Whether no panel is registered.
    pub fn is_empty(&self) -> bool {
        self.panels.read().is_empty()
    }

    /// Empties every panel, keeping the registrations.
    pub fn clear_contents(&self) {
        for panel in self.panels.read().values() {
            panel.clear();
        }
    }
}

impl core::fmt::Debug for PanelRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.panels.read().iter()).finish()
    }
}
