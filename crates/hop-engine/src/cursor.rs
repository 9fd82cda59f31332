//! Focus cursor.
//!
//! [`NavigationController`] owns the result collection and the single focus
//! cursor over it. The cursor is either unfocused (index -1) or focused on a
//! candidate; moving past the known end triggers a larger refresh, and a move
//! that still lands on nothing leaves the cursor where it was.

use hop_core::{GrowthConfig, HopConfig};

use crate::collection::ResultCollection;
use crate::document::Document;
use crate::error::EngineResult;
use crate::exclusion::ExclusionResolver;
use crate::path::PathExpr;

// =============================================================================
// Focus State
// =============================================================================

/// Observable cursor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Nothing focused yet (index -1).
    Unfocused,
    /// Candidate at this index is focused.
    Focused(usize),
}

/// The focused candidate and the background it had before highlighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusedNode<E> {
    pub index: usize,
    pub element: E,
    pub prior_background: Option<String>,
}

/// Refresh size used when index `n` is not yet known: `n * factor`, at least
/// `floor`, and always enough to include `n`.
pub fn refresh_size(growth: GrowthConfig, n: usize) -> usize {
    n.saturating_mul(growth.factor)
        .max(growth.floor)
        .max(n.saturating_add(1))
}

// =============================================================================
// Navigation Controller
// =============================================================================

/// Result collection plus focus cursor for one page view.
#[derive(Debug)]
pub struct NavigationController<E> {
    results: ResultCollection<E>,
    focus: Option<FocusedNode<E>>,
    growth: GrowthConfig,
    highlight: String,
}

impl<E: Clone + Eq + std::hash::Hash + std::fmt::Debug> NavigationController<E> {
    /// Create an unfocused controller.
    pub fn new(results: ResultCollection<E>, growth: GrowthConfig, highlight: String) -> Self {
        Self {
            results,
            focus: None,
            growth,
            highlight,
        }
    }

    /// Build an unfocused controller from configuration.
    pub fn from_config(config: &HopConfig) -> EngineResult<Self> {
        let results = ResultCollection::new(
            PathExpr::parse(&config.results.path)?,
            ExclusionResolver::new(
                PathExpr::parse(&config.exclusion.marker_path)?,
                config.exclusion.depth,
            ),
            config.results.excluded_targets.clone(),
        );
        Ok(Self::new(
            results,
            config.growth,
            config.appearance.highlight.clone(),
        ))
    }

    /// Build a controller and focus the first result right away.
    pub fn start<D: Document<Element = E>>(doc: &mut D, config: &HopConfig) -> EngineResult<Self> {
        let mut controller = Self::from_config(config)?;
        if !controller.home(doc) {
            tracing::info!("no results on page");
        }
        Ok(controller)
    }

    /// Focus the candidate at `n` (negative clamps to 0).
    ///
    /// Returns `true` if a candidate was focused. When there is none, even
    /// after refreshing, the cursor is left unchanged.
    pub fn focus_node<D: Document<Element = E>>(&mut self, doc: &mut D, n: isize) -> bool {
        let n = usize::try_from(n).unwrap_or(0);

        if n >= self.results.current_size() {
            let size = refresh_size(self.growth, n);
            tracing::debug!(index = n, size, "index past known results, refreshing");
            self.results.refresh(&*doc, size);
        }

        let Some(element) = self.results.get(n).cloned() else {
            tracing::debug!(index = n, "no result at index, focus unchanged");
            return false;
        };

        self.update_focused(doc, n, element);
        true
    }

    /// Focus the next candidate.
    pub fn move_down<D: Document<Element = E>>(&mut self, doc: &mut D) -> bool {
        self.focus_node(doc, self.index() + 1)
    }

    /// Focus the previous candidate. From unfocused this focuses the first.
    pub fn move_up<D: Document<Element = E>>(&mut self, doc: &mut D) -> bool {
        self.focus_node(doc, self.index() - 1)
    }

    /// Focus the first candidate.
    pub fn home<D: Document<Element = E>>(&mut self, doc: &mut D) -> bool {
        self.focus_node(doc, 0)
    }

    /// Restore the old element before capturing the new one's background, so a
    /// highlight is never recorded as a prior colour.
    fn update_focused<D: Document<Element = E>>(&mut self, doc: &mut D, index: usize, element: E) {
        if let Some(previous) = self.focus.take() {
            doc.set_background(&previous.element, previous.prior_background);
        }

        let prior_background = doc.background(&element);
        doc.focus(&element);
        doc.set_background(&element, Some(self.highlight.clone()));
        tracing::debug!(index, ?element, "focused result");

        self.focus = Some(FocusedNode {
            index,
            element,
            prior_background,
        });
    }

    /// Cursor index, -1 when unfocused.
    pub fn index(&self) -> isize {
        self.focus
            .as_ref()
            .map_or(-1, |focused| focused.index as isize)
    }

    /// Cursor state.
    pub fn state(&self) -> CursorState {
        match &self.focus {
            Some(focused) => CursorState::Focused(focused.index),
            None => CursorState::Unfocused,
        }
    }

    /// Focused element.
    pub fn focused(&self) -> Option<&E> {
        self.focus.as_ref().map(|focused| &focused.element)
    }

    /// Full focus record.
    pub fn focus_state(&self) -> Option<&FocusedNode<E>> {
        self.focus.as_ref()
    }

    /// Result collection.
    pub fn results(&self) -> &ResultCollection<E> {
        &self.results
    }

    /// Highlight colour applied to the focused element.
    pub fn highlight(&self) -> &str {
        &self.highlight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, NodeId};
    use crate::test_support::{add_result, plain_page, scenario_page};

    const HIGHLIGHT: &str = "#fcff5c";

    fn controller() -> NavigationController<NodeId> {
        NavigationController::from_config(&HopConfig::default()).unwrap()
    }

    #[test]
    fn test_refresh_size() {
        let growth = GrowthConfig::default();
        assert_eq!(refresh_size(growth, 0), 5);
        assert_eq!(refresh_size(growth, 2), 5);
        assert_eq!(refresh_size(growth, 3), 6);
        assert_eq!(refresh_size(growth, 5), 10);

        let flat = GrowthConfig { factor: 1, floor: 0 };
        assert_eq!(refresh_size(flat, 0), 1);
        assert_eq!(refresh_size(flat, 7), 8);
    }

    #[test]
    fn test_start_focuses_first_result() {
        let mut page = plain_page(3);
        let nav = NavigationController::start(&mut page.doc, &HopConfig::default()).unwrap();

        assert_eq!(nav.state(), CursorState::Focused(0));
        assert_eq!(nav.focused(), Some(&page.links[0]));
        assert_eq!(page.doc.focused(), Some(page.links[0]));
        assert_eq!(page.doc.background(&page.links[0]).as_deref(), Some(HIGHLIGHT));
        assert_eq!(nav.results().current_size(), 3);
    }

    #[test]
    fn test_start_with_invalid_path_fails() {
        let mut config = HopConfig::default();
        config.results.path = "a[@href]".to_string();
        let mut doc = MemoryDocument::new();
        assert!(NavigationController::<NodeId>::start(&mut doc, &config).is_err());
    }

    #[test]
    fn test_empty_page_stays_unfocused() {
        let mut page = plain_page(0);
        let mut nav = controller();

        assert!(!nav.focus_node(&mut page.doc, 0));
        assert_eq!(nav.state(), CursorState::Unfocused);
        assert_eq!(nav.index(), -1);
        assert_eq!(nav.focused(), None);
        assert_eq!(page.doc.focused(), None);
        assert!(page.doc.descendants().all(|id| page.doc.background(&id).is_none()));
    }

    #[test]
    fn test_focus_each_index() {
        let mut page = plain_page(9);
        let mut nav = controller();

        for n in 0..9 {
            assert!(nav.focus_node(&mut page.doc, n as isize));
            assert_eq!(nav.state(), CursorState::Focused(n));
            assert_eq!(nav.focused(), Some(&page.links[n]));
        }
    }

    #[test]
    fn test_refresh_grows_lazily() {
        let mut page = plain_page(20);
        let mut nav = NavigationController::start(&mut page.doc, &HopConfig::default()).unwrap();
        assert_eq!(nav.results().current_size(), 5);

        // Within known results: no refresh.
        assert!(nav.focus_node(&mut page.doc, 4));
        assert_eq!(nav.results().current_size(), 5);

        assert!(nav.move_down(&mut page.doc));
        assert_eq!(nav.index(), 5);
        assert_eq!(nav.results().current_size(), 10);

        assert!(nav.focus_node(&mut page.doc, 12));
        assert_eq!(nav.results().current_size(), 20);
    }

    #[test]
    fn test_scenario_end_of_results() {
        let mut page = scenario_page();
        let mut nav = controller();

        assert!(nav.focus_node(&mut page.doc, 4));
        assert_eq!(nav.state(), CursorState::Focused(4));
        assert_eq!(nav.results().candidates(), &page.links[..5]);
        assert_eq!(page.doc.background(&page.links[4]).as_deref(), Some(HIGHLIGHT));

        assert!(!nav.move_down(&mut page.doc));
        assert_eq!(nav.results().current_size(), 5);
        assert_eq!(nav.results().get(5), None);
        assert_eq!(nav.state(), CursorState::Focused(4));
        assert_eq!(nav.focused(), Some(&page.links[4]));
        assert_eq!(page.doc.background(&page.links[4]).as_deref(), Some(HIGHLIGHT));
        assert_eq!(page.doc.background(&page.links[5]), None);
    }

    #[test]
    fn test_prior_background_restored() {
        let mut page = plain_page(3);
        page.doc.set_background(&page.links[0], Some("white".to_string()));
        let mut nav = NavigationController::start(&mut page.doc, &HopConfig::default()).unwrap();

        assert_eq!(
            nav.focus_state().unwrap().prior_background.as_deref(),
            Some("white")
        );

        assert!(nav.move_down(&mut page.doc));
        assert_eq!(page.doc.background(&page.links[0]).as_deref(), Some("white"));
        assert_eq!(page.doc.background(&page.links[1]).as_deref(), Some(HIGHLIGHT));
        assert_eq!(nav.focus_state().unwrap().prior_background, None);

        assert!(nav.move_up(&mut page.doc));
        assert_eq!(page.doc.background(&page.links[1]), None);
        assert_eq!(page.doc.background(&page.links[0]).as_deref(), Some(HIGHLIGHT));
    }

    #[test]
    fn test_refocus_same_index_is_idempotent() {
        let mut page = plain_page(3);
        page.doc.set_background(&page.links[1], Some("azure".to_string()));
        let mut nav = controller();

        assert!(nav.focus_node(&mut page.doc, 1));
        let before = nav.focus_state().cloned();

        assert!(nav.focus_node(&mut page.doc, 1));
        assert_eq!(nav.focus_state().cloned(), before);
        assert_eq!(page.doc.background(&page.links[1]).as_deref(), Some(HIGHLIGHT));
        assert_eq!(
            nav.focus_state().unwrap().prior_background.as_deref(),
            Some("azure")
        );
    }

    #[test]
    fn test_move_up_clamps_at_zero() {
        let mut page = plain_page(3);
        let mut nav = controller();

        // From unfocused, up means the first result.
        assert!(nav.move_up(&mut page.doc));
        assert_eq!(nav.index(), 0);

        assert!(nav.move_up(&mut page.doc));
        assert_eq!(nav.index(), 0);
        assert_eq!(page.doc.background(&page.links[0]).as_deref(), Some(HIGHLIGHT));
    }

    #[test]
    fn test_move_down_from_unfocused() {
        let mut page = plain_page(2);
        let mut nav = controller();
        assert!(nav.move_down(&mut page.doc));
        assert_eq!(nav.state(), CursorState::Focused(0));
    }

    #[test]
    fn test_negative_focus_clamps() {
        let mut page = plain_page(2);
        let mut nav = controller();
        assert!(nav.focus_node(&mut page.doc, -7));
        assert_eq!(nav.index(), 0);
    }

    #[test]
    fn test_results_appended_later_are_reached() {
        let mut page = plain_page(2);
        let mut nav = NavigationController::start(&mut page.doc, &HopConfig::default()).unwrap();
        assert!(nav.move_down(&mut page.doc));
        assert!(!nav.move_down(&mut page.doc));
        assert_eq!(nav.index(), 1);

        // More results render after the user reaches the end.
        let late = add_result(&mut page.doc, page.body, "https://late.example/");
        assert!(nav.move_down(&mut page.doc));
        assert_eq!(nav.focused(), Some(&late));
    }

    #[test]
    fn test_home_after_panel_inserted_above() {
        let mut page = plain_page(3);
        let mut nav = NavigationController::start(&mut page.doc, &HopConfig::default()).unwrap();
        assert!(nav.focus_node(&mut page.doc, 2));

        // A secondary-topic panel wraps a new result at the top of the page.
        let panel = page.doc.insert(Some(page.body), 0, "div", &[]);
        let a = page.doc.append(Some(panel), "div", &[]);
        let b = page.doc.append(Some(a), "div", &[]);
        page.doc.append(Some(b), "div", &[("aria-level", "2")]);
        add_result(&mut page.doc, a, "https://panel.example/");

        // Known size is 3, so index 0 is served from the current list.
        assert!(nav.home(&mut page.doc));
        assert_eq!(nav.focused(), Some(&page.links[0]));

        // A refresh re-derives exclusions and still skips the panel link.
        assert!(!nav.focus_node(&mut page.doc, 3));
        assert_eq!(nav.results().candidates(), page.links.as_slice());
        assert_eq!(nav.focused(), Some(&page.links[0]));
    }
}
