mod app;
mod config;
mod error;
mod loader;
mod logger;
mod markdown;
mod nav;
mod outline;
mod registry;
mod router;
mod site;
mod slug;
mod storage;
mod theme;
mod web;

#[cfg(test)]
mod testing;

use app::*;
use leptos::mount::mount_to_body;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
    mount_to_body(|| view! { <App/> })
}
