//! Site configuration and the embedded page manifest.

use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::markdown::RenderOptions;
use crate::registry::{Registry, Section};

/// Manifest compiled into the binary.
pub const MANIFEST: &str = include_str!("../docs.json");

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub default_page: String,
    pub narrow_viewport_px: u32,
    pub scroll_margin_px: u32,
    pub hash_scroll_delay_ms: u64,
    pub outline_threshold: f64,
    pub line_breaks: bool,
    pub heading_ids: bool,
    pub gfm: bool,
    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            default_page: "introduction".to_string(),
            narrow_viewport_px: 768,
            scroll_margin_px: 100,
            hash_scroll_delay_ms: 100,
            outline_threshold: 0.5,
            line_breaks: true,
            heading_ids: true,
            gfm: true,
            log_level: "info".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            line_breaks: self.line_breaks,
            heading_ids: self.heading_ids,
            gfm: self.gfm,
            scroll_margin_px: self.scroll_margin_px,
        }
    }

    pub fn hash_scroll_delay(&self) -> Duration {
        Duration::from_millis(self.hash_scroll_delay_ms)
    }

    pub fn is_narrow(&self, viewport_width: f64) -> bool {
        viewport_width <= f64::from(self.narrow_viewport_px)
    }

    /// Unrecognised levels fall back to `info`.
    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

#[derive(Deserialize, Debug)]
struct Manifest {
    #[serde(default)]
    site: SiteConfig,
    sections: Vec<Section>,
}

/// Parses a manifest and validates its table of contents.
pub fn load_manifest(json: &str) -> Result<(SiteConfig, Registry)> {
    let manifest: Manifest = serde_json::from_str(json)?;
    let registry = Registry::new(manifest.sections, &manifest.site.default_page)?;
    Ok((manifest.site, registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocsError;

    #[test]
    fn embedded_manifest_is_valid() {
        let (config, registry) = load_manifest(MANIFEST).unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(registry.default_page(), "introduction");
        assert_eq!(registry.sections().len(), 2);
        assert_eq!(registry.sections()[0].title, "Getting Started");
        assert_eq!(registry.find("nest").unwrap().title, "NEST+");
        assert_eq!(registry.pages().count(), 7);
    }

    #[test]
    fn site_section_is_optional() {
        let (config, registry) = load_manifest(
            r##"{ "sections": [ { "title": "Docs", "items": [
                { "id": "introduction", "title": "Intro", "type": "inline", "content": "# Hi" }
            ] } ] }"##,
        )
        .unwrap();
        assert_eq!(config.narrow_viewport_px, 768);
        assert!(registry.contains("introduction"));
    }

    #[test]
    fn partial_site_section_keeps_defaults() {
        let (config, _) = load_manifest(
            r#"{ "site": { "default_page": "home", "log_level": "debug" },
                 "sections": [ { "title": "Docs", "items": [
                    { "id": "home", "title": "Home", "type": "inline", "content": "" }
                 ] } ] }"#,
        )
        .unwrap();
        assert_eq!(config.default_page, "home");
        assert_eq!(config.log_level(), LevelFilter::Debug);
        assert_eq!(config.scroll_margin_px, 100);
    }

    #[test]
    fn default_page_must_exist() {
        let err = load_manifest(
            r#"{ "site": { "default_page": "missing" },
                 "sections": [ { "title": "Docs", "items": [
                    { "id": "home", "title": "Home", "type": "inline", "content": "" }
                 ] } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DocsError::MissingDefault(_)));
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        assert!(matches!(
            load_manifest("{ not json"),
            Err(DocsError::Manifest(_))
        ));
    }

    #[test]
    fn narrow_breakpoint_is_inclusive() {
        let config = SiteConfig::default();
        assert!(config.is_narrow(768.0));
        assert!(config.is_narrow(320.0));
        assert!(!config.is_narrow(1024.0));
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let config = SiteConfig {
            log_level: "chatty".into(),
            ..SiteConfig::default()
        };
        assert_eq!(config.log_level(), LevelFilter::Info);
    }
}
