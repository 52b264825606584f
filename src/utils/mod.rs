//! Utility modules for web, DOM, and rendering operations.
//!
//! Provides:
//! - [`HttpSource`], [`fetch_index`] - Network fetching with timeout
//! - [`MarkdownRenderer`] - Markdown rendering with XSS sanitization
//! - [`FragmentWatcher`] - `hashchange` listener or polling fallback
//! - [`dom`] - Post-render DOM passes (sidenotes, links, code, title)

pub mod dom;
mod fetch;
mod fragment;
pub mod log;
mod markdown;

pub use fetch::{HttpSource, fetch_index};
pub use fragment::FragmentWatcher;
pub use markdown::{MarkdownRenderer, markdown_to_html};
