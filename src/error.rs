//! Error types for the documentation site.

/// Everything that can go wrong between the manifest and a rendered page.
///
/// None of these are fatal at runtime: navigation errors degrade to the
/// default page or the static error panel, and missing UI hooks only disable
/// the feature that needed them.
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("unknown page: {0}")]
    UnknownPage(String),

    #[error("failed to fetch `{path}`: {reason}")]
    Fetch { path: String, reason: String },

    #[error("missing UI element: {0}")]
    MissingElement(&'static str),

    #[error("duplicate page id: {0}")]
    DuplicatePage(String),

    #[error("default page `{0}` is not registered")]
    MissingDefault(String),

    #[error("section `{0}` has no pages")]
    EmptySection(String),

    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl DocsError {
    pub fn fetch(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, DocsError>;
