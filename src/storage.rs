use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub const THEME_KEY: &str = "theme";
pub const CURRENT_PAGE_KEY: &str = "currentPage";

/// Origin-scoped string store, `localStorage` in the browser.
///
/// Writes go through `&self`: handles are cheap clones of one underlying
/// store, shared by the theme manager and the site.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// In-memory store, used when `localStorage` is unavailable and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}
