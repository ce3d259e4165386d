//! Sidebar model: sections and links built from the registry, plus which link
//! is active and whether the sidebar is open.

use crate::registry::Registry;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavLink {
    pub page_id: String,
    pub title: String,
}

impl NavLink {
    pub fn href(&self) -> String {
        format!("#{}", self.page_id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavSection {
    pub title: String,
    pub links: Vec<NavLink>,
}

pub fn build(registry: &Registry) -> Vec<NavSection> {
    registry
        .sections()
        .iter()
        .map(|section| NavSection {
            title: section.title.clone(),
            links: section
                .items
                .iter()
                .map(|page| NavLink {
                    page_id: page.id.clone(),
                    title: page.title.clone(),
                })
                .collect(),
        })
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavState {
    active: Option<String>,
    sidebar_open: bool,
}

impl NavState {
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Marks the link for `page_id` active, clearing every other link.
    /// An id without a link leaves nothing active.
    pub fn set_active(&mut self, registry: &Registry, page_id: &str) -> Option<&str> {
        self.active = registry.contains(page_id).then(|| page_id.to_string());
        self.active()
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    #[cfg(test)]
    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    /// Closes the sidebar after a link click on a narrow viewport.
    /// Returns whether anything changed.
    pub fn collapse_if_narrow(&mut self, narrow: bool) -> bool {
        if narrow && self.sidebar_open {
            self.sidebar_open = false;
            true
        } else {
            false
        }
    }
}
