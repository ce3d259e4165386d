use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

const EMPTY_SLUG: &str = "section";

/// Lowercases `text` and collapses every run outside `[a-z0-9]` into one `-`.
pub fn slugify(text: &str) -> String {
    static RE_SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let re = RE_SEPARATORS.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap());

    let lowered = text.to_lowercase();
    let slug = re.replace_all(&lowered, "-").into_owned();
    if slug.bytes().all(|b| b == b'-') {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// Hands out unique heading ids for one rendered page.
///
/// The first heading with a given slug keeps it; later ones get `-1`, `-2`,
/// and so on, skipping anything already taken. Reserved ids (page ids) are
/// never handed out so a heading anchor cannot be mistaken for a page.
#[derive(Debug, Default)]
pub struct SlugAllocator {
    counters: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl SlugAllocator {
    pub fn with_reserved<'a>(reserved: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            counters: HashMap::new(),
            taken: reserved.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn allocate(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut counter = self.counters.get(&base).copied().unwrap_or(0);
        let mut candidate = base.clone();
        while self.taken.contains(&candidate) {
            counter += 1;
            candidate = format!("{base}-{counter}");
        }
        self.counters.insert(base, counter);
        self.taken.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("Canvas  &  Spotify"), "canvas-spotify");
        assert_eq!(slugify("NEST+"), "nest-");
        assert_eq!(slugify("v2.0 Release"), "v2-0-release");
    }

    #[test]
    fn symbol_only_text_gets_placeholder() {
        assert_eq!(slugify("!!!"), "section");
        assert_eq!(slugify(""), "section");
    }

    #[test]
    fn case_variants_are_disambiguated_in_order() {
        let mut slugs = SlugAllocator::default();
        assert_eq!(slugs.allocate("Getting Started"), "getting-started");
        assert_eq!(slugs.allocate("getting started"), "getting-started-1");
        assert_eq!(slugs.allocate("GETTING STARTED"), "getting-started-2");
    }

    #[test]
    fn suffixes_skip_literal_collisions() {
        let mut slugs = SlugAllocator::default();
        assert_eq!(slugs.allocate("A"), "a");
        assert_eq!(slugs.allocate("A 1"), "a-1");
        assert_eq!(slugs.allocate("A"), "a-2");
    }

    #[test]
    fn reserved_ids_are_never_returned() {
        let mut slugs = SlugAllocator::with_reserved(["canvas", "nest"]);
        assert_eq!(slugs.allocate("Canvas"), "canvas-1");
        assert_eq!(slugs.allocate("Nest"), "nest-1");
        assert_eq!(slugs.allocate("Spotify"), "spotify");
    }
}
