//! In-memory stand-ins for the browser, shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::outline::{Outline, OutlineEntry};
use crate::registry::{PageDescriptor, Registry, Section};
use crate::router::{History, HistoryState};
use crate::site::DocView;

pub fn fixture_registry() -> Registry {
    Registry::new(
        vec![
            Section {
                title: "Getting Started".into(),
                items: vec![
                    PageDescriptor::inline("introduction", "Intro", "# Intro\n\nWelcome to the docs.\n"),
                    PageDescriptor::markdown("quick-start", "Setup", "quick-start.md"),
                ],
            },
            Section {
                title: "Core Features".into(),
                items: vec![
                    PageDescriptor::inline(
                        "basics",
                        "Calendar and Task Management",
                        "# Calendar\n\nPlan the week.\n\n## Getting Started\n\nOne.\n\n## getting started\n\nTwo.\n",
                    ),
                    PageDescriptor::markdown("nest", "NEST+", "nest.md"),
                ],
            },
        ],
        "introduction",
    )
    .expect("fixture registry is valid")
}

#[derive(Debug)]
struct Entries {
    stack: Vec<(Option<HistoryState>, String)>,
    cursor: usize,
}

/// Session history with browser push/replace/back semantics.
#[derive(Clone, Debug)]
pub struct MemoryHistory {
    inner: Rc<RefCell<Entries>>,
}

impl MemoryHistory {
    pub fn new(fragment: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Entries {
                stack: vec![(None, fragment.to_string())],
                cursor: 0,
            })),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().stack.len()
    }

    pub fn state(&self) -> Option<HistoryState> {
        let entries = self.inner.borrow();
        entries.stack[entries.cursor].0.clone()
    }

    /// Moves back one entry and returns the state the browser would hand to `popstate`.
    pub fn back(&self) -> Option<HistoryState> {
        {
            let mut entries = self.inner.borrow_mut();
            assert!(entries.cursor > 0, "no entry to go back to");
            entries.cursor -= 1;
        }
        self.state()
    }

    /// What typing `#fragment` into the address bar does: a stateless entry.
    pub fn push_fragment(&self, fragment: &str) {
        self.push_entry(None, fragment);
    }

    fn push_entry(&self, state: Option<HistoryState>, fragment: &str) {
        let mut entries = self.inner.borrow_mut();
        let keep = entries.cursor + 1;
        entries.stack.truncate(keep);
        entries.stack.push((state, fragment.to_string()));
        entries.cursor = keep;
    }
}

impl History for MemoryHistory {
    fn fragment(&self) -> String {
        let entries = self.inner.borrow();
        entries.stack[entries.cursor].1.clone()
    }

    fn push(&mut self, state: &HistoryState, fragment: &str) {
        self.push_entry(Some(state.clone()), fragment);
    }

    fn replace(&mut self, state: &HistoryState, fragment: &str) {
        let mut entries = self.inner.borrow_mut();
        let cursor = entries.cursor;
        entries.stack[cursor] = (Some(state.clone()), fragment.to_string());
    }
}

/// Records what the site asked the UI to show.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub title: String,
    pub content: String,
    pub renders: usize,
    pub highlights: usize,
    pub outline: Vec<OutlineEntry>,
    pub active_heading: Option<String>,
    pub active_link: Option<String>,
    pub sidebar_open: bool,
    pub scrolled_to_top: usize,
    pub scrolled_to: Vec<(String, Duration)>,
}

impl DocView for RecordingView {
    fn set_page_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_content(&mut self, html: &str) {
        self.content = html.to_string();
        self.renders += 1;
    }

    fn highlight_code(&mut self) {
        self.highlights += 1;
    }

    fn show_outline(&mut self, outline: &Outline) {
        self.outline = outline.entries().to_vec();
        self.active_heading = outline.active_id().map(str::to_string);
    }

    fn set_active_heading(&mut self, id: Option<&str>) {
        self.active_heading = id.map(str::to_string);
    }

    fn set_active_link(&mut self, page_id: Option<&str>) {
        self.active_link = page_id.map(str::to_string);
    }

    fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open = open;
    }

    fn scroll_to_top(&mut self) {
        self.scrolled_to_top += 1;
    }

    fn scroll_to_heading(&mut self, id: &str, delay: Duration) {
        self.scrolled_to.push((id.to_string(), delay));
    }
}
