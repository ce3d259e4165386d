//! Fragment routing: which page and heading the URL and history entry encode.

use serde::{Deserialize, Serialize};

use crate::registry::Registry;

/// What the site is showing, as recorded in the URL fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationState {
    pub page_id: String,
    pub scroll_target: Option<String>,
}

impl NavigationState {
    pub fn page(page_id: &str) -> Self {
        Self {
            page_id: page_id.to_string(),
            scroll_target: None,
        }
    }

    /// A fragment naming anything other than the page is a heading to scroll to.
    pub fn with_fragment(page_id: &str, fragment: &str) -> Self {
        Self {
            page_id: page_id.to_string(),
            scroll_target: (!fragment.is_empty() && fragment != page_id)
                .then(|| fragment.to_string()),
        }
    }
}

/// State object stored on each history entry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HistoryState {
    #[serde(rename = "pageId")]
    pub page_id: String,
}

impl HistoryState {
    pub fn new(page_id: &str) -> Self {
        Self {
            page_id: page_id.to_string(),
        }
    }
}

/// Session history, `window.history` plus `location.hash` in the browser.
pub trait History {
    /// Current fragment without the leading `#`.
    fn fragment(&self) -> String;
    fn push(&mut self, state: &HistoryState, fragment: &str);
    fn replace(&mut self, state: &HistoryState, fragment: &str);
}

/// Strips the leading `#` from a `location.hash` value.
pub fn fragment_of(hash: &str) -> &str {
    hash.strip_prefix('#').unwrap_or(hash)
}

/// How the first page is chosen from the URL when the site starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitialRoute {
    /// No fragment: push an entry for the default page.
    Navigate(String),
    /// Load without touching history.
    Load(NavigationState),
    /// The fragment is a heading on the last viewed page; rewrite the entry's state.
    Restore(NavigationState),
}

#[derive(Clone, Debug)]
pub struct Router {
    default_page: String,
}

impl Router {
    pub fn new(registry: &Registry) -> Self {
        Self {
            default_page: registry.default_page().to_string(),
        }
    }

    /// Records a forward navigation. Navigating to the page already in the
    /// fragment replaces the entry so repeats never stack up.
    pub fn navigate<H: History>(&self, history: &mut H, page_id: &str) -> NavigationState {
        let state = HistoryState::new(page_id);
        if history.fragment() == page_id {
            history.replace(&state, page_id);
        } else {
            history.push(&state, page_id);
        }
        NavigationState::page(page_id)
    }

    /// Points the current entry at `page_id` so back-navigation skips the
    /// page that failed.
    pub fn redirect<H: History>(&self, history: &mut H, page_id: &str) -> NavigationState {
        history.replace(&HistoryState::new(page_id), page_id);
        NavigationState::page(page_id)
    }

    /// Back/forward: prefer the entry's state, then the fragment, then the default page.
    pub fn restore(&self, state: Option<&HistoryState>, fragment: &str) -> NavigationState {
        match state {
            Some(state) => NavigationState::with_fragment(&state.page_id, fragment),
            None if !fragment.is_empty() => NavigationState::page(fragment),
            None => NavigationState::page(&self.default_page),
        }
    }

    pub fn initial(
        &self,
        registry: &Registry,
        fragment: &str,
        last_page: Option<&str>,
    ) -> InitialRoute {
        if fragment.is_empty() {
            return InitialRoute::Navigate(self.default_page.clone());
        }
        if registry.contains(fragment) {
            return InitialRoute::Load(NavigationState::page(fragment));
        }
        match last_page.filter(|id| registry.contains(id)) {
            Some(page_id) => InitialRoute::Restore(NavigationState::with_fragment(page_id, fragment)),
            None => InitialRoute::Load(NavigationState::page(fragment)),
        }
    }
}
