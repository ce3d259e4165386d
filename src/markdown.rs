use pulldown_cmark::{html, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::slug::SlugAllocator;

/// Options handed to the Markdown renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Render single newlines as `<br />`.
    pub line_breaks: bool,
    /// Give h3-h6 ids too. h1/h2 always get one because the outline links to them.
    pub heading_ids: bool,
    pub gfm: bool,
    pub scroll_margin_px: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            line_breaks: true,
            heading_ids: true,
            gfm: true,
            scroll_margin_px: 100,
        }
    }
}

impl RenderOptions {
    fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    fn heading_style(&self) -> String {
        format!(
            "display: inline-block; width: 100%; scroll-margin-top: {}px;",
            self.scroll_margin_px
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub id: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    /// Every heading that received an id, in document order.
    pub headings: Vec<Heading>,
}

/// Renders `source` to HTML. Ids in `reserved` are never used as heading ids.
pub fn render<'r>(
    source: &str,
    options: &RenderOptions,
    reserved: impl IntoIterator<Item = &'r str>,
) -> RenderedPage {
    let mut events: Vec<Event> = Parser::new_ext(source, options.parser_options())
        .map(|event| match event {
            Event::SoftBreak if options.line_breaks => Event::HardBreak,
            other => other,
        })
        .collect();

    let mut slugs = SlugAllocator::with_reserved(reserved);
    let style = options.heading_style();
    let mut headings = Vec::new();

    for (start, level, text) in heading_spans(&events) {
        let level = level as u8;
        let id = (level <= 2 || options.heading_ids).then(|| slugs.allocate(&text));

        if let Event::Start(Tag::Heading {
            id: id_slot, attrs, ..
        }) = &mut events[start]
        {
            if let Some(id) = &id {
                *id_slot = Some(CowStr::from(id.clone()));
            }
            if level <= 4 {
                attrs.push((CowStr::from("style"), Some(CowStr::from(style.clone()))));
            }
        }

        if let Some(id) = id {
            headings.push(Heading { level, id, text });
        }
    }

    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    RenderedPage {
        html: out,
        headings,
    }
}

/// Index of each heading's start event, its level and its plain text.
fn heading_spans(events: &[Event]) -> Vec<(usize, HeadingLevel, String)> {
    let mut spans = Vec::new();
    let mut open: Option<(usize, String)> = None;
    for (idx, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading { .. }) => open = Some((idx, String::new())),
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = open.as_mut() {
                    buf.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(level)) => {
                if let Some((start, text)) = open.take() {
                    spans.push((start, *level, text));
                }
            }
            _ => {}
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_default(source: &str) -> RenderedPage {
        render(source, &RenderOptions::default(), [])
    }

    #[test]
    fn assigns_ids_and_styles_headings() {
        let page = render_default("# Getting Started\n\n## Install `ticked`\n");
        assert_eq!(
            page.headings,
            vec![
                Heading {
                    level: 1,
                    id: "getting-started".into(),
                    text: "Getting Started".into()
                },
                Heading {
                    level: 2,
                    id: "install-ticked".into(),
                    text: "Install ticked".into()
                },
            ]
        );
        assert!(page.html.contains(
            "<h1 id=\"getting-started\" style=\"display: inline-block; width: 100%; scroll-margin-top: 100px;\">"
        ));
    }

    #[test]
    fn inline_html_in_headings_keeps_its_text() {
        let page = render_default("# Foo <span>bar</span>\n");
        assert_eq!(page.headings[0].text, "Foo bar");
        assert_eq!(page.headings[0].id, "foo-bar");
    }

    #[test]
    fn deep_headings_are_not_styled() {
        let page = render_default("##### Footnote\n");
        assert!(page.html.contains("<h5 id=\"footnote\">"));
        assert!(!page.html.contains("style="));
    }

    #[test]
    fn heading_ids_option_only_affects_deeper_levels() {
        let options = RenderOptions {
            heading_ids: false,
            ..RenderOptions::default()
        };
        let page = render("# Top\n\n### Detail\n", &options, []);
        assert_eq!(page.headings.len(), 1);
        assert!(page.html.contains("<h1 id=\"top\""));
        assert!(page.html.contains("<h3 style="));
    }

    #[test]
    fn duplicate_heading_text_gets_distinct_ids() {
        let page = render_default("# Getting Started\n\n# getting started\n");
        let ids: Vec<_> = page.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["getting-started", "getting-started-1"]);
    }

    #[test]
    fn reserved_page_ids_are_skipped() {
        let page = render("# Canvas\n", &RenderOptions::default(), ["canvas"]);
        assert_eq!(page.headings[0].id, "canvas-1");
    }

    #[test]
    fn soft_breaks_follow_line_break_option() {
        let page = render_default("first\nsecond\n");
        assert!(page.html.contains("first<br />"));

        let options = RenderOptions {
            line_breaks: false,
            ..RenderOptions::default()
        };
        let page = render("first\nsecond\n", &options, []);
        assert!(!page.html.contains("<br"));
    }

    #[test]
    fn gfm_extensions_are_toggleable() {
        let source = "| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n";
        let page = render_default(source);
        assert!(page.html.contains("<table>"));
        assert!(page.html.contains("<del>gone</del>"));

        let options = RenderOptions {
            gfm: false,
            ..RenderOptions::default()
        };
        let page = render(source, &options, []);
        assert!(!page.html.contains("<table>"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let source = "# A\n\ntext\n\n## B\n\n```rust\nfn main() {}\n```\n";
        assert_eq!(render_default(source), render_default(source));
    }
}
