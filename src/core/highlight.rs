//! Current page / current section derivation for the sidebar.

use crate::models::Outline;

/// Sidebar marking for the visible document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Highlight {
    /// Href (with `#`) of the entry marked as current page
    pub active_entry: Option<String>,
    /// The single section left expanded
    pub active_section: String,
}

/// Derive the sidebar marking for a URL fragment (with or without `#`).
///
/// - Empty fragment: the outline's default section, no current page.
/// - A section header link: that header is current and its section shown.
/// - Any other entry: that entry is current and its enclosing section shown.
/// - No matching entry: the default section.
pub fn derive(outline: &Outline, fragment: &str) -> Highlight {
    let fragment = fragment.trim_start_matches('#');
    let fallback = || Highlight {
        active_entry: None,
        active_section: outline.default_section.clone(),
    };
    if fragment.is_empty() {
        return fallback();
    }

    let href = format!("#{}", fragment);
    outline
        .sections
        .iter()
        .find(|s| s.header.as_ref().is_some_and(|h| h.href == href) || s.contains(&href))
        .map(|section| Highlight {
            active_entry: Some(href.clone()),
            active_section: section.id.clone(),
        })
        .unwrap_or_else(fallback)
}
