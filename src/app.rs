use leptos::ev::MouseEvent;
use leptos::prelude::*;

use crate::config;
use crate::loader::ERROR_PANEL_HTML;
use crate::logger;
use crate::nav::{self, NavSection};
use crate::site::Site;
use crate::theme::{Theme, ThemeManager};
use crate::web::{
    self, BrowserHistory, BrowserStore, DocSignals, SiteHandle, ThemeHandle, ThemeSignal,
};

#[component]
pub fn App() -> impl IntoView {
    let (config, registry) = match config::load_manifest(config::MANIFEST) {
        Ok(loaded) => loaded,
        Err(err) => {
            log::error!("cannot start the documentation site: {err}");
            return view! {
                <main class="doc-content" style="padding: 2rem 3rem;" inner_html=ERROR_PANEL_HTML></main>
            }
            .into_any();
        }
    };
    logger::init(config.log_level());

    let store = BrowserStore::open();

    let theme = RwSignal::new(Theme::default());
    let themes: ThemeHandle =
        StoredValue::new_local(ThemeManager::new(store.clone(), ThemeSignal(theme)));
    themes.update_value(|themes| {
        themes.init(web::os_prefers_dark());
    });
    web::listen_os_theme(move |prefers_dark| {
        themes.update_value(|themes| {
            themes.on_os_change(prefers_dark);
        });
    });

    let signals = DocSignals::new();
    let sections = nav::build(&registry);
    let threshold = config.outline_threshold;
    let site: SiteHandle = StoredValue::new_local(Site::new(
        registry,
        config,
        signals,
        BrowserHistory,
        store,
    ));

    if let Err(err) = web::install_scroll_spy(threshold, move |reports| {
        site.update_value(|site| site.observe_headings(&reports));
    }) {
        log::warn!("outline highlighting disabled: {err}");
    }
    web::listen_pop_state(move |state| {
        let job = site.try_update_value(|site| site.pop_state(state)).flatten();
        web::run_jobs(site, job);
    });

    let job = site.try_update_value(|site| site.start()).flatten();
    web::run_jobs(site, job);

    view! {
        <div class="app-layout" style="display: flex; min-height: 100vh; background: var(--bg-primary); color: var(--text-primary);">
            <Sidebar sections=sections site=site signals=signals />
            <div class="main-column" style="flex: 1; display: flex; flex-direction: column; min-width: 0;">
                <Topbar site=site signals=signals themes=themes theme=theme />
                <div class="content-row" style="flex: 1; display: flex;">
                    <article
                        id=web::CONTENT_ID
                        class="doc-content"
                        style="flex: 1; min-width: 0; padding: 2rem 3rem;"
                        inner_html=move || signals.content_html.get()
                    ></article>
                    <SectionNav site=site signals=signals />
                </div>
            </div>
        </div>
    }
    .into_any()
}

#[component]
fn Sidebar(sections: Vec<NavSection>, site: SiteHandle, signals: DocSignals) -> impl IntoView {
    view! {
        <nav
            class=move || if signals.sidebar_open.get() { "sidebar active" } else { "sidebar" }
            style="width: var(--sidebar-width); border-right: 1px solid var(--border-color); background: var(--bg-secondary); overflow-y: auto;"
        >
            <div id="sidebar-nav" style="padding: 0.75rem 0.5rem;">
                {sections.into_iter().map(move |section| view! {
                    <div class="nav-section">
                        <h2 class="nav-section-title">{section.title}</h2>
                        <ul class="nav-items">
                            {section.links.into_iter().map(move |link| {
                                let href = link.href();
                                let page_id = link.page_id.clone();
                                let click_id = link.page_id;
                                let is_active = move || signals.active_page.get().as_deref() == Some(page_id.as_str());

                                view! {
                                    <li class="nav-item">
                                        <a
                                            href=href
                                            class=move || if is_active() { "nav-link active" } else { "nav-link" }
                                            on:click=move |ev: MouseEvent| {
                                                ev.prevent_default();
                                                let width = web::viewport_width();
                                                let job = site
                                                    .try_update_value(|site| site.follow_link(&click_id, width))
                                                    .flatten();
                                                web::run_jobs(site, job);
                                            }
                                        >
                                            {link.title}
                                        </a>
                                    </li>
                                }
                            }).collect::<Vec<_>>()}
                        </ul>
                    </div>
                }).collect::<Vec<_>>()}
            </div>
        </nav>
    }
}

#[component]
fn Topbar(
    site: SiteHandle,
    signals: DocSignals,
    themes: ThemeHandle,
    theme: RwSignal<Theme>,
) -> impl IntoView {
    view! {
        <header class="topbar" style="height: var(--topbar-height); display: flex; align-items: center; gap: 1rem; padding: 0 1.5rem; border-bottom: 1px solid var(--border-color);">
            <button
                id="menu-toggle"
                class="menu-toggle"
                aria-label="Toggle navigation"
                on:click=move |_| site.update_value(|site| site.toggle_sidebar())
            >
                "☰"
            </button>
            <span id="current-page-title" style="flex: 1; font-weight: 600;">
                {move || signals.page_title.get()}
            </span>
            <button
                id="theme-switch"
                class="theme-switch"
                aria-label=move || theme.get().toggle_label()
                on:click=move |_| themes.update_value(|themes| {
                    themes.toggle();
                })
                style="background: transparent; border: none; font-size: 1.2rem; cursor: pointer;"
            >
                {move || theme.get().toggle_icon()}
            </button>
        </header>
    }
}

#[component]
fn SectionNav(site: SiteHandle, signals: DocSignals) -> impl IntoView {
    view! {
        <aside class="section-nav-container" style="width: 220px; padding: 2rem 1rem; font-size: 0.9rem;">
            <ul id="section-nav" class="section-nav" style="list-style: none; margin: 0; padding: 0;">
                {move || signals.outline.get().into_iter().map(move |entry| {
                    let href = entry.href();
                    let indent = if entry.is_nested() { "padding-left: 1rem;" } else { "" };
                    let id = entry.id.clone();
                    let click_id = entry.id;
                    let is_active = move || signals.active_heading.get().as_deref() == Some(id.as_str());

                    view! {
                        <li>
                            <a
                                href=href
                                style=indent
                                class=move || if is_active() { "active" } else { "" }
                                on:click=move |ev: MouseEvent| {
                                    ev.prevent_default();
                                    site.update_value(|site| site.select_heading(&click_id));
                                }
                            >
                                {entry.title}
                            </a>
                        </li>
                    }
                }).collect::<Vec<_>>()}
            </ul>
        </aside>
    }
}
