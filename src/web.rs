//! Browser implementations of the site's ports, plus the event wiring that
//! only makes sense against a real DOM.

use std::cell::RefCell;
use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MediaQueryList, MediaQueryListEvent, PopStateEvent, Response, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition, Storage,
};

use crate::error::{DocsError, Result};
use crate::outline::{HeadingVisibility, Outline, OutlineEntry};
use crate::router::{fragment_of, History, HistoryState};
use crate::site::{DocView, FetchJob, Site};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::theme::{Theme, ThemeManager, ThemeView};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = hljs, js_name = highlightElement)]
    fn highlight_element(block: &Element) -> std::result::Result<(), JsValue>;
}

pub const CONTENT_ID: &str = "doc-content";
const CODE_BLOCKS: &str = "#doc-content pre code";
const OUTLINE_HEADINGS: &str = "#doc-content h1, #doc-content h2";
const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

pub type WebSite = Site<DocSignals, BrowserHistory, BrowserStore>;
pub type SiteHandle = StoredValue<WebSite, LocalStorage>;
pub type ThemeHandle = StoredValue<ThemeManager<BrowserStore, ThemeSignal>, LocalStorage>;

thread_local! {
    static SCROLL_SPY: RefCell<Option<IntersectionObserver>> = const { RefCell::new(None) };
}

/// Reactive state the view renders from.
#[derive(Clone, Copy)]
pub struct DocSignals {
    pub page_title: RwSignal<String>,
    pub content_html: RwSignal<String>,
    pub outline: RwSignal<Vec<OutlineEntry>>,
    pub active_heading: RwSignal<Option<String>>,
    pub active_page: RwSignal<Option<String>>,
    pub sidebar_open: RwSignal<bool>,
}

impl DocSignals {
    pub fn new() -> Self {
        Self {
            page_title: RwSignal::new(String::new()),
            content_html: RwSignal::new(String::new()),
            outline: RwSignal::new(Vec::new()),
            active_heading: RwSignal::new(None),
            active_page: RwSignal::new(None),
            sidebar_open: RwSignal::new(false),
        }
    }
}

impl DocView for DocSignals {
    fn set_page_title(&mut self, title: &str) {
        self.page_title.set(title.to_string());
    }

    fn set_content(&mut self, html: &str) {
        self.content_html.set(html.to_string());
    }

    fn highlight_code(&mut self) {
        // Runs after the new content has been patched into the DOM.
        request_animation_frame(highlight_code_blocks);
    }

    fn show_outline(&mut self, outline: &Outline) {
        self.outline.set(outline.entries().to_vec());
        self.active_heading.set(outline.active_id().map(str::to_string));
        request_animation_frame(observe_headings);
    }

    fn set_active_heading(&mut self, id: Option<&str>) {
        self.active_heading.set(id.map(str::to_string));
    }

    fn set_active_link(&mut self, page_id: Option<&str>) {
        self.active_page.set(page_id.map(str::to_string));
    }

    fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open.set(open);
    }

    fn scroll_to_top(&mut self) {
        window().scroll_to_with_x_and_y(0.0, 0.0);
    }

    fn scroll_to_heading(&mut self, id: &str, delay: Duration) {
        let id = id.to_string();
        if delay.is_zero() {
            scroll_into_view(&id);
        } else {
            set_timeout(move || scroll_into_view(&id), delay);
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserHistory;

impl BrowserHistory {
    fn write(&self, state: &HistoryState, fragment: &str, replace: bool) {
        let history = match window().history() {
            Ok(history) => history,
            Err(err) => {
                log::warn!("history unavailable: {err:?}");
                return;
            }
        };
        let value = serde_wasm_bindgen::to_value(state).unwrap_or(JsValue::NULL);
        let url = format!("#{fragment}");
        let written = if replace {
            history.replace_state_with_url(&value, "", Some(&url))
        } else {
            history.push_state_with_url(&value, "", Some(&url))
        };
        if let Err(err) = written {
            log::warn!("could not update history for `{url}`: {err:?}");
        }
    }
}

impl History for BrowserHistory {
    fn fragment(&self) -> String {
        window()
            .location()
            .hash()
            .map(|hash| fragment_of(&hash).to_string())
            .unwrap_or_default()
    }

    fn push(&mut self, state: &HistoryState, fragment: &str) {
        self.write(state, fragment, false);
    }

    fn replace(&mut self, state: &HistoryState, fragment: &str) {
        self.write(state, fragment, true);
    }
}

/// `localStorage`, or memory when the browser refuses access.
#[derive(Clone)]
pub enum BrowserStore {
    Local(Storage),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn open() -> Self {
        match window().local_storage() {
            Ok(Some(storage)) => Self::Local(storage),
            _ => {
                log::warn!(
                    "{}; preferences will not persist",
                    DocsError::MissingElement("localStorage")
                );
                Self::Memory(MemoryStore::default())
            }
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            Self::Local(storage) => storage.get_item(key).ok().flatten(),
            Self::Memory(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) {
        match self {
            Self::Local(storage) => {
                if let Err(err) = storage.set_item(key, value) {
                    log::warn!("could not persist `{key}`: {err:?}");
                }
            }
            Self::Memory(store) => store.set(key, value),
        }
    }
}

/// Theme output: `data-theme` on `<html>` and the signal behind the toggle button.
#[derive(Clone, Copy)]
pub struct ThemeSignal(pub RwSignal<Theme>);

impl ThemeView for ThemeSignal {
    fn apply(&mut self, theme: Theme) {
        match document().document_element() {
            Some(root) => {
                if let Err(err) = root.set_attribute("data-theme", theme.as_str()) {
                    log::warn!("could not set data-theme: {err:?}");
                }
            }
            None => log::warn!("{}", DocsError::MissingElement("document root")),
        }
        self.0.set(theme);
    }
}

fn dark_query() -> Option<MediaQueryList> {
    window().match_media(DARK_QUERY).ok().flatten()
}

pub fn os_prefers_dark() -> bool {
    dark_query().is_some_and(|query| query.matches())
}

pub fn listen_os_theme(on_change: impl Fn(bool) + 'static) {
    let Some(query) = dark_query() else {
        log::warn!("{}", DocsError::MissingElement("prefers-color-scheme query"));
        return;
    };
    let closure = Closure::<dyn FnMut(MediaQueryListEvent)>::new(move |e: MediaQueryListEvent| {
        on_change(e.matches());
    });
    if let Err(err) = query.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref()) {
        log::warn!("could not follow OS theme changes: {err:?}");
    }
    closure.forget();
}

pub fn listen_pop_state(on_pop: impl Fn(Option<HistoryState>) + 'static) {
    let closure = Closure::<dyn FnMut(PopStateEvent)>::new(move |e: PopStateEvent| {
        on_pop(serde_wasm_bindgen::from_value::<HistoryState>(e.state()).ok());
    });
    if let Err(err) = window().add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref()) {
        log::warn!("could not listen for popstate: {err:?}");
    }
    closure.forget();
}

/// Creates the viewport observer that feeds outline highlighting.
pub fn install_scroll_spy(
    threshold: f64,
    on_reports: impl Fn(Vec<HeadingVisibility>) + 'static,
) -> Result<()> {
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, _observer: IntersectionObserver| {
            let reports = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| HeadingVisibility {
                    id: entry.target().id(),
                    ratio: if entry.is_intersecting() {
                        entry.intersection_ratio()
                    } else {
                        0.0
                    },
                })
                .collect();
            on_reports(reports);
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
            .map_err(|_| DocsError::MissingElement("IntersectionObserver"))?;
    callback.forget();

    SCROLL_SPY.with(|spy| *spy.borrow_mut() = Some(observer));
    Ok(())
}

/// Points the observer at the headings of the page now in the DOM.
fn observe_headings() {
    SCROLL_SPY.with(|spy| {
        let spy = spy.borrow();
        let Some(observer) = spy.as_ref() else {
            return;
        };
        observer.disconnect();
        for heading in query_all(OUTLINE_HEADINGS) {
            observer.observe(&heading);
        }
    });
}

fn highlight_code_blocks() {
    for block in query_all(CODE_BLOCKS) {
        if let Err(err) = highlight_element(&block) {
            log::warn!("syntax highlighter unavailable: {err:?}");
            return;
        }
    }
}

fn query_all(selector: &str) -> Vec<Element> {
    let Ok(nodes) = document().query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|idx| nodes.item(idx))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn scroll_into_view(id: &str) {
    let Some(element) = document().get_element_by_id(id) else {
        log::debug!("heading `{id}` is not in the document");
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

pub fn viewport_width() -> f64 {
    window()
        .inner_width()
        .ok()
        .and_then(|width| width.as_f64())
        .unwrap_or(f64::INFINITY)
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

pub async fn fetch_text(path: &str) -> Result<String> {
    let response = JsFuture::from(window().fetch_with_str(path))
        .await
        .map_err(|err| DocsError::fetch(path, describe(&err)))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| DocsError::fetch(path, "not a response"))?;
    if !response.ok() {
        return Err(DocsError::fetch(path, format!("HTTP {}", response.status())));
    }
    let body = response
        .text()
        .map_err(|err| DocsError::fetch(path, describe(&err)))?;
    let text = JsFuture::from(body)
        .await
        .map_err(|err| DocsError::fetch(path, describe(&err)))?;
    text.as_string()
        .ok_or_else(|| DocsError::fetch(path, "body is not text"))
}

/// Performs fetch jobs one after another until the site stops asking.
pub fn run_jobs(site: SiteHandle, job: Option<FetchJob>) {
    let Some(first) = job else {
        return;
    };
    spawn_local(async move {
        let mut next = Some(first);
        while let Some(job) = next {
            let result = fetch_text(&job.path).await;
            next = site
                .try_update_value(|site| site.finish(job.token, result))
                .flatten();
        }
    });
}
