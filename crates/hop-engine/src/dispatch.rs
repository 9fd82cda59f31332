//! Action dispatch.
//!
//! Turns key presses into navigation actions and runs them against the
//! current page. Every action degrades to a no-op when its target is missing;
//! nothing here can fail once the dispatcher is built.

use std::sync::Arc;

use hop_core::{CaretEdit, HopConfig, NavAction};
use serde::Serialize;

use crate::cursor::NavigationController;
use crate::document::FormDocument;
use crate::error::EngineResult;
use crate::field::QueryFieldEditor;
use crate::keymap::KeymapRegistry;
use crate::path::PathExpr;

// =============================================================================
// Collaborators
// =============================================================================

/// Opens link targets.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator {
    /// Open `url` in a new browsing context.
    fn open_in_new_tab(&mut self, url: &str);

    /// Replace the current page with `url`.
    fn redirect(&mut self, url: &str);
}

/// Performs a user-equivalent activation (click) of an element.
pub trait ActivationTarget<E> {
    fn activate(&mut self, element: &E);
}

// =============================================================================
// Outcome
// =============================================================================

/// What a dispatched action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Focus moved to a candidate (possibly the same one).
    Moved,
    /// No candidate at the target index; focus unchanged.
    Unchanged,
    /// A link target was handed to the navigator.
    Opened,
    /// The focused element was activated.
    Activated,
    /// The query field was edited.
    Edited,
    /// The action's target was missing.
    Skipped,
    /// The key has no binding.
    Unbound,
}

impl Outcome {
    fn moved(moved: bool) -> Self {
        if moved {
            Self::Moved
        } else {
            Self::Unchanged
        }
    }
}

// =============================================================================
// Action Dispatch
// =============================================================================

/// Owns the navigation state for one page view and routes actions into it.
pub struct ActionDispatch<E, N, A> {
    controller: NavigationController<E>,
    keymap: Arc<KeymapRegistry>,
    query_field: QueryFieldEditor,
    navigator: N,
    activator: A,
}

impl<E, N, A> ActionDispatch<E, N, A>
where
    E: Clone + Eq + std::hash::Hash + std::fmt::Debug,
    N: Navigator,
    A: ActivationTarget<E>,
{
    pub fn new(
        controller: NavigationController<E>,
        keymap: Arc<KeymapRegistry>,
        query_field: QueryFieldEditor,
        navigator: N,
        activator: A,
    ) -> Self {
        Self {
            controller,
            keymap,
            query_field,
            navigator,
            activator,
        }
    }

    /// Build everything from configuration and focus the first result.
    pub fn start<D: FormDocument<Element = E>>(
        doc: &mut D,
        config: &HopConfig,
        navigator: N,
        activator: A,
    ) -> EngineResult<Self> {
        let keymap = KeymapRegistry::with_defaults();
        keymap.apply_config(&config.keymap)?;
        let query_field = QueryFieldEditor::new(PathExpr::parse(&config.query_field.path)?);
        let controller = NavigationController::start(doc, config)?;

        tracing::info!(
            bindings = keymap.binding_count(),
            results = controller.results().current_size(),
            "navigation started"
        );
        Ok(Self::new(
            controller,
            Arc::new(keymap),
            query_field,
            navigator,
            activator,
        ))
    }

    /// Run the action bound to `key`.
    pub fn handle_key<D: FormDocument<Element = E>>(&mut self, doc: &mut D, key: &str) -> Outcome {
        match self.keymap.lookup(key) {
            Some(action) => self.dispatch(doc, action),
            None => {
                tracing::debug!("No binding for key: {}", key);
                Outcome::Unbound
            }
        }
    }

    /// Run `action`.
    pub fn dispatch<D: FormDocument<Element = E>>(
        &mut self,
        doc: &mut D,
        action: NavAction,
    ) -> Outcome {
        tracing::debug!(action = action.name(), "dispatching");
        match action {
            NavAction::Home => Outcome::moved(self.controller.home(doc)),
            NavAction::Down => Outcome::moved(self.controller.move_down(doc)),
            NavAction::Up => Outcome::moved(self.controller.move_up(doc)),
            NavAction::OpenInNewTab => self.open(doc, false),
            NavAction::OpenHere => self.open(doc, true),
            NavAction::Activate => match self.controller.focused() {
                Some(element) => {
                    self.activator.activate(element);
                    Outcome::Activated
                }
                None => Outcome::Skipped,
            },
            NavAction::AppendToQuery => self.edit_query(doc, CaretEdit::AppendToEnd),
            NavAction::InsertAtQueryStart => self.edit_query(doc, CaretEdit::InsertAtStart),
            NavAction::SelectQuery => self.edit_query(doc, CaretEdit::SelectAll),
        }
    }

    fn open<D: FormDocument<Element = E>>(&mut self, doc: &D, here: bool) -> Outcome {
        let Some(href) = self
            .controller
            .focused()
            .and_then(|element| doc.href(element))
        else {
            tracing::debug!("focused element has no link target");
            return Outcome::Skipped;
        };

        if here {
            tracing::info!("Redirecting to {}", href);
            self.navigator.redirect(&href);
        } else {
            tracing::info!("Opening {} in new tab", href);
            self.navigator.open_in_new_tab(&href);
        }
        Outcome::Opened
    }

    fn edit_query<D: FormDocument<Element = E>>(&self, doc: &mut D, edit: CaretEdit) -> Outcome {
        if self.query_field.edit(doc, edit) {
            Outcome::Edited
        } else {
            Outcome::Skipped
        }
    }

    /// Navigation state.
    pub fn controller(&self) -> &NavigationController<E> {
        &self.controller
    }

    /// Shared keymap. Bindings changed through it apply to the next key.
    pub fn keymap(&self) -> Arc<KeymapRegistry> {
        self.keymap.clone()
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn activator(&self) -> &A {
        &self.activator
    }
}
