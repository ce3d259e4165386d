use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DocsError, Result};

/// Where a page's Markdown comes from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PageSource {
    Markdown { path: String },
    Inline { content: String },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PageDescriptor {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub source: PageSource,
}

#[cfg(test)]
impl PageDescriptor {
    pub fn markdown(id: &str, title: &str, path: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            source: PageSource::Markdown {
                path: path.to_string(),
            },
        }
    }

    pub fn inline(id: &str, title: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            source: PageSource::Inline {
                content: content.to_string(),
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub items: Vec<PageDescriptor>,
}

/// The table of contents. Validated once, then only read.
#[derive(Clone, Debug)]
pub struct Registry {
    sections: Vec<Section>,
    default_page: String,
}

impl Registry {
    pub fn new(sections: Vec<Section>, default_page: &str) -> Result<Self> {
        let mut seen = HashSet::new();
        for section in &sections {
            if section.items.is_empty() {
                return Err(DocsError::EmptySection(section.title.clone()));
            }
            for page in &section.items {
                if !seen.insert(page.id.as_str()) {
                    return Err(DocsError::DuplicatePage(page.id.clone()));
                }
            }
        }
        if !seen.contains(default_page) {
            return Err(DocsError::MissingDefault(default_page.to_string()));
        }

        Ok(Self {
            sections,
            default_page: default_page.to_string(),
        })
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn default_page(&self) -> &str {
        &self.default_page
    }

    pub fn pages(&self) -> impl Iterator<Item = &PageDescriptor> {
        self.sections.iter().flat_map(|section| section.items.iter())
    }

    pub fn find(&self, id: &str) -> Option<&PageDescriptor> {
        self.pages().find(|page| page.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn page_ids(&self) -> impl Iterator<Item = &str> {
        self.pages().map(|page| page.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(title: &str, items: Vec<PageDescriptor>) -> Section {
        Section {
            title: title.to_string(),
            items,
        }
    }

    #[test]
    fn finds_pages_across_sections() {
        let registry = Registry::new(
            vec![
                section("A", vec![PageDescriptor::inline("one", "One", "# One")]),
                section("B", vec![PageDescriptor::markdown("two", "Two", "two.md")]),
            ],
            "one",
        )
        .unwrap();

        assert_eq!(registry.find("two").unwrap().title, "Two");
        assert!(registry.find("three").is_none());
        assert_eq!(registry.page_ids().collect::<Vec<_>>(), vec!["one", "two"]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Registry::new(
            vec![
                section("A", vec![PageDescriptor::inline("one", "One", "")]),
                section("B", vec![PageDescriptor::inline("one", "Again", "")]),
            ],
            "one",
        )
        .unwrap_err();
        assert!(matches!(err, DocsError::DuplicatePage(id) if id == "one"));
    }

    #[test]
    fn rejects_unregistered_default() {
        let err = Registry::new(
            vec![section("A", vec![PageDescriptor::inline("one", "One", "")])],
            "introduction",
        )
        .unwrap_err();
        assert!(matches!(err, DocsError::MissingDefault(_)));
    }

    #[test]
    fn rejects_empty_section() {
        let err = Registry::new(
            vec![
                section("A", vec![PageDescriptor::inline("one", "One", "")]),
                section("Empty", Vec::new()),
            ],
            "one",
        )
        .unwrap_err();
        assert!(matches!(err, DocsError::EmptySection(title) if title == "Empty"));
    }

    #[test]
    fn section_titles_may_repeat() {
        let registry = Registry::new(
            vec![
                section("Guides", vec![PageDescriptor::inline("one", "One", "")]),
                section("Guides", vec![PageDescriptor::inline("two", "Two", "")]),
            ],
            "one",
        );
        assert!(registry.is_ok());
    }

    #[test]
    fn deserializes_tagged_sources() {
        let page: PageDescriptor = serde_json::from_str(
            r#"{ "id": "intro", "title": "Intro", "type": "markdown", "path": "intro.md" }"#,
        )
        .unwrap();
        assert_eq!(page, PageDescriptor::markdown("intro", "Intro", "intro.md"));

        let page: PageDescriptor = serde_json::from_str(
            r##"{ "id": "faq", "title": "FAQ", "type": "inline", "content": "# FAQ" }"##,
        )
        .unwrap();
        assert_eq!(page.source, PageSource::Inline { content: "# FAQ".into() });
    }
}
