use crate::error::DocsError;
use crate::registry::{PageDescriptor, Registry};
use crate::router::NavigationState;

/// Shown when even the default page cannot be loaded.
pub const ERROR_PANEL_HTML: &str = "<h1>Error Loading Page</h1>\n\
<p>Failed to load the documentation. Please try refreshing the page.</p>";

/// Identifies one load. Only the newest token may complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavToken(u64);

/// Where a failed load goes next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fallback {
    Redirect(String),
    /// Terminal: the failing page is the default page.
    ErrorPanel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingLoad {
    pub token: NavToken,
    pub page: PageDescriptor,
    pub target: NavigationState,
    pub scroll_to_top: bool,
}

#[derive(Debug)]
pub enum LoadStep {
    /// Descriptor found; its source still has to be read.
    Ready(PendingLoad),
    Missing(Fallback),
}

#[derive(Debug)]
pub enum Completion {
    /// A newer load started after this one; drop the result.
    Stale,
    Loaded { load: PendingLoad, markdown: String },
    Failed {
        load: PendingLoad,
        error: DocsError,
        fallback: Fallback,
    },
}

/// Resolves page ids to descriptors and tracks the single in-flight load.
#[derive(Debug)]
pub struct PageLoader {
    default_page: String,
    issued: u64,
    in_flight: Option<PendingLoad>,
}

impl PageLoader {
    pub fn new(registry: &Registry) -> Self {
        Self {
            default_page: registry.default_page().to_string(),
            issued: 0,
            in_flight: None,
        }
    }

    /// Starts a load, superseding whatever was in flight.
    pub fn begin(
        &mut self,
        registry: &Registry,
        target: NavigationState,
        scroll_to_top: bool,
    ) -> LoadStep {
        self.in_flight = None;
        let Some(page) = registry.find(&target.page_id) else {
            return LoadStep::Missing(self.fallback(&target.page_id));
        };

        self.issued += 1;
        let load = PendingLoad {
            token: NavToken(self.issued),
            page: page.clone(),
            target,
            scroll_to_top,
        };
        self.in_flight = Some(load.clone());
        LoadStep::Ready(load)
    }

    pub fn complete(&mut self, token: NavToken, result: Result<String, DocsError>) -> Completion {
        if !self.is_current(token) {
            return Completion::Stale;
        }
        let Some(load) = self.in_flight.take() else {
            return Completion::Stale;
        };
        match result {
            Ok(markdown) => Completion::Loaded { load, markdown },
            Err(error) => Completion::Failed {
                fallback: self.fallback(&load.page.id),
                load,
                error,
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_current(&self, token: NavToken) -> bool {
        self.in_flight.as_ref().is_some_and(|load| load.token == token)
    }

    pub fn fallback(&self, failed_page: &str) -> Fallback {
        if failed_page == self.default_page {
            Fallback::ErrorPanel
        } else {
            Fallback::Redirect(self.default_page.clone())
        }
    }
}
