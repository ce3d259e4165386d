//! Keeps history, URL fragment, rendered content, sidebar and outline in step.
//!
//! Every UI event maps to one synchronous method here. Methods that start a
//! load may hand back a [`FetchJob`]; the caller performs the fetch and passes
//! the result to [`Site::finish`], which may in turn return the next job (a
//! failed page redirecting to a default page that also needs fetching).

use std::time::Duration;

use crate::config::SiteConfig;
use crate::error::DocsError;
use crate::loader::{Completion, Fallback, LoadStep, NavToken, PageLoader, PendingLoad, ERROR_PANEL_HTML};
use crate::markdown;
use crate::nav::NavState;
use crate::outline::{HeadingVisibility, Outline};
use crate::registry::{PageSource, Registry};
use crate::router::{History, HistoryState, InitialRoute, NavigationState, Router};
use crate::storage::{KeyValueStore, CURRENT_PAGE_KEY};

/// UI hooks the site drives.
pub trait DocView {
    fn set_page_title(&mut self, title: &str);
    fn set_content(&mut self, html: &str);
    /// Run the syntax highlighter over the code blocks just rendered.
    fn highlight_code(&mut self);
    fn show_outline(&mut self, outline: &Outline);
    fn set_active_heading(&mut self, id: Option<&str>);
    fn set_active_link(&mut self, page_id: Option<&str>);
    fn set_sidebar_open(&mut self, open: bool);
    fn scroll_to_top(&mut self);
    fn scroll_to_heading(&mut self, id: &str, delay: Duration);
}

/// Markdown that has to be fetched before `token`'s load can finish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchJob {
    pub token: NavToken,
    pub path: String,
}

pub struct Site<V, H, S> {
    registry: Registry,
    config: SiteConfig,
    router: Router,
    loader: PageLoader,
    nav: NavState,
    outline: Outline,
    current: Option<NavigationState>,
    view: V,
    history: H,
    store: S,
}

impl<V: DocView, H: History, S: KeyValueStore> Site<V, H, S> {
    pub fn new(registry: Registry, config: SiteConfig, view: V, history: H, store: S) -> Self {
        Self {
            router: Router::new(&registry),
            loader: PageLoader::new(&registry),
            registry,
            config,
            nav: NavState::default(),
            outline: Outline::default(),
            current: None,
            view,
            history,
            store,
        }
    }

    #[cfg(test)]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[cfg(test)]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Page of the last successful render.
    pub fn current_page(&self) -> Option<&str> {
        self.current.as_ref().map(|state| state.page_id.as_str())
    }

    /// Resolves the first page from the URL fragment.
    pub fn start(&mut self) -> Option<FetchJob> {
        let fragment = self.history.fragment();
        let last_page = self.store.get(CURRENT_PAGE_KEY);
        match self.router.initial(&self.registry, &fragment, last_page.as_deref()) {
            InitialRoute::Navigate(page_id) => self.navigate(&page_id),
            InitialRoute::Load(target) => self.load(target, true),
            InitialRoute::Restore(target) => {
                self.history
                    .replace(&HistoryState::new(&target.page_id), &fragment);
                self.load(target, true)
            }
        }
    }

    pub fn navigate(&mut self, page_id: &str) -> Option<FetchJob> {
        let target = self.router.navigate(&mut self.history, page_id);
        self.load(target, true)
    }

    /// Sidebar link click.
    pub fn follow_link(&mut self, page_id: &str, viewport_width: f64) -> Option<FetchJob> {
        let active = self.nav.set_active(&self.registry, page_id);
        self.view.set_active_link(active);
        if self.nav.collapse_if_narrow(self.config.is_narrow(viewport_width)) {
            self.view.set_sidebar_open(false);
        }
        self.navigate(page_id)
    }

    pub fn toggle_sidebar(&mut self) {
        let open = self.nav.toggle_sidebar();
        self.view.set_sidebar_open(open);
    }

    /// Browser back/forward. Never pushes.
    pub fn pop_state(&mut self, state: Option<HistoryState>) -> Option<FetchJob> {
        let fragment = self.history.fragment();
        if state.is_none() && !self.loader.is_loading() && self.outline.contains(&fragment) {
            // Hash edited by hand to a heading on the page being shown.
            self.scroll_to_heading(&fragment, Duration::ZERO);
            return None;
        }
        let target = self.router.restore(state.as_ref(), &fragment);
        self.load(target, true)
    }

    /// Outline entry click: scroll and point the fragment at the heading
    /// without adding a history entry.
    pub fn select_heading(&mut self, id: &str) {
        // The outline still belongs to the previous page until the load lands.
        if self.loader.is_loading() {
            return;
        }
        let Some(page_id) = self.current_page().map(str::to_string) else {
            return;
        };
        if !self.outline.contains(id) {
            return;
        }
        self.scroll_to_heading(id, Duration::ZERO);
        self.history.replace(&HistoryState::new(&page_id), id);
        if let Some(current) = self.current.as_mut() {
            current.scroll_target = Some(id.to_string());
        }
    }

    /// Viewport observer callback.
    pub fn observe_headings(&mut self, reports: &[HeadingVisibility]) {
        if self.outline.observe(reports, self.config.outline_threshold) {
            self.view.set_active_heading(self.outline.active_id());
        }
    }

    /// Completes the load identified by `token`.
    pub fn finish(&mut self, token: NavToken, result: Result<String, DocsError>) -> Option<FetchJob> {
        match self.loader.complete(token, result) {
            Completion::Stale => {
                log::debug!("discarding result of superseded load {token:?}");
                None
            }
            Completion::Loaded { load, markdown } => {
                self.render(load, &markdown);
                None
            }
            Completion::Failed {
                load,
                error,
                fallback,
            } => {
                log::error!("error loading page `{}`: {error}", load.page.id);
                self.fall_back(fallback)
            }
        }
    }

    fn load(&mut self, target: NavigationState, scroll_to_top: bool) -> Option<FetchJob> {
        let requested = target.page_id.clone();
        match self.loader.begin(&self.registry, target, scroll_to_top) {
            LoadStep::Missing(fallback) => {
                log::warn!("{}", DocsError::UnknownPage(requested));
                self.fall_back(fallback)
            }
            LoadStep::Ready(load) => {
                self.store.set(CURRENT_PAGE_KEY, &load.page.id);
                self.view.set_page_title(&load.page.title);
                match &load.page.source {
                    PageSource::Inline { content } => {
                        let content = content.clone();
                        self.finish(load.token, Ok(content))
                    }
                    PageSource::Markdown { path } => Some(FetchJob {
                        token: load.token,
                        path: path.clone(),
                    }),
                }
            }
        }
    }

    fn fall_back(&mut self, fallback: Fallback) -> Option<FetchJob> {
        match fallback {
            Fallback::Redirect(page_id) => {
                log::warn!("redirecting to `{page_id}`");
                let target = self.router.redirect(&mut self.history, &page_id);
                self.load(target, true)
            }
            Fallback::ErrorPanel => {
                self.nav.clear_active();
                self.view.set_active_link(None);
                self.current = None;
                self.outline = Outline::default();
                self.view.set_content(ERROR_PANEL_HTML);
                self.view.show_outline(&self.outline);
                None
            }
        }
    }

    fn render(&mut self, load: PendingLoad, source: &str) {
        let page = markdown::render(
            source,
            &self.config.render_options(),
            self.registry.page_ids(),
        );
        self.view.set_content(&page.html);
        self.view.highlight_code();

        self.outline = Outline::from_headings(&page.headings);
        self.view.show_outline(&self.outline);

        if load.scroll_to_top {
            self.view.scroll_to_top();
        }
        if let Some(target) = &load.target.scroll_target {
            if page.headings.iter().any(|heading| &heading.id == target) {
                self.scroll_to_heading(target, self.config.hash_scroll_delay());
            } else {
                log::debug!("no heading `{target}` on page `{}`", load.page.id);
            }
        }

        let active = self.nav.set_active(&self.registry, &load.page.id);
        self.view.set_active_link(active);
        self.current = Some(load.target);
    }

    fn scroll_to_heading(&mut self, id: &str, delay: Duration) {
        if self.outline.set_active(id) {
            self.view.set_active_heading(self.outline.active_id());
        }
        self.view.scroll_to_heading(id, delay);
    }
}
