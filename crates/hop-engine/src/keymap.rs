//! Keymap registry.
//!
//! Maps key names to navigation actions. Defaults are registered first and
//! user bindings from config.toml are applied on top, so user bindings win.
//!
//! ```text
//! [defaults]  ──►                       ──►  lookup("j")
//!                  KeymapRegistry                │
//! [config.toml] ─► apply_config()                ▼
//!                                          NavAction::Down
//! ```

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

use hop_core::NavAction;

use crate::error::{EngineError, EngineResult};

/// Action name that removes a binding when used in config.
pub const UNBIND: &str = "none";

/// Default bindings: vi-style movement plus query-field editing.
pub const DEFAULT_BINDINGS: &[(&str, NavAction)] = &[
    ("h", NavAction::Home),
    ("j", NavAction::Down),
    ("k", NavAction::Up),
    ("l", NavAction::OpenInNewTab),
    ("o", NavAction::OpenHere),
    ("enter", NavAction::Activate),
    ("a", NavAction::AppendToQuery),
    ("i", NavAction::InsertAtQueryStart),
    ("s", NavAction::SelectQuery),
];

/// Normalize a key name: trimmed, lowercase, `-` separators as `+`.
///
/// Accepts both "ctrl+n" and "Ctrl-N".
pub fn normalize_key(key: &str) -> String {
    let key = key.trim();
    if key.len() > 1 {
        key.to_lowercase().replace('-', "+")
    } else {
        key.to_lowercase()
    }
}

/// Registry of key bindings.
///
/// Later bindings for the same key overwrite earlier ones.
#[derive(Default)]
pub struct KeymapRegistry {
    bindings: RwLock<HashMap<String, NavAction>>,
}

impl KeymapRegistry {
    /// Create a new empty keymap registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding [`DEFAULT_BINDINGS`].
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        for (key, action) in DEFAULT_BINDINGS {
            registry.set(key, *action);
        }
        registry
    }

    /// Apply user bindings (key -> action name) over the current ones.
    ///
    /// Fails on the first unknown action name; bindings applied before it stay.
    pub fn apply_config(&self, keymap: &BTreeMap<String, String>) -> EngineResult<()> {
        for (key, name) in keymap {
            if name == UNBIND {
                self.del(key);
                tracing::debug!("Unbound key: {}", key);
                continue;
            }

            let action = NavAction::from_name(name).ok_or_else(|| EngineError::UnknownAction {
                key: key.clone(),
                action: name.clone(),
            })?;
            self.set(key, action);
            tracing::debug!("Registered binding: {} -> {}", key, name);
        }
        Ok(())
    }

    /// Add a binding. If the key is already bound, it's overwritten.
    pub fn set(&self, key: &str, action: NavAction) {
        self.bindings.write().insert(normalize_key(key), action);
    }

    /// Delete a binding.
    ///
    /// Returns `true` if a binding was removed.
    pub fn del(&self, key: &str) -> bool {
        self.bindings.write().remove(&normalize_key(key)).is_some()
    }

    /// Action bound to `key`.
    pub fn lookup(&self, key: &str) -> Option<NavAction> {
        self.bindings.read().get(&normalize_key(key)).copied()
    }

    /// All bindings sorted by key.
    pub fn bindings(&self) -> Vec<(String, NavAction)> {
        let mut bindings: Vec<_> = self
            .bindings
            .read()
            .iter()
            .map(|(key, action)| (key.clone(), *action))
            .collect();
        bindings.sort_by(|a, b| a.0.cmp(&b.0));
        bindings
    }

    /// Get the number of bindings.
    pub fn binding_count(&self) -> usize {
        self.bindings.read().len()
    }
}
