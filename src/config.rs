//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the application.
//! The sidebar outline is loaded at compile time using `include_str!`.

// =============================================================================
// Text Assets (loaded at compile time)
// =============================================================================

/// Sidebar outline (guide sections and package listings).
pub const OUTLINE_TOML: &str = include_str!("../assets/outline.toml");

// =============================================================================
// Application Metadata
// =============================================================================

/// Document title suffix, and the whole title when a page has no heading.
pub const DOCUMENT_TITLE_ROOT: &str = "Add-on SDK Documentation";

// =============================================================================
// Routing Configuration
// =============================================================================

/// Hash shown when the URL has no fragment or an unrecognized one.
pub const DEFAULT_HASH: &str = "#guide/welcome";

/// Guide page behind [`DEFAULT_HASH`].
pub const DEFAULT_GUIDE_PAGE: &str = "welcome";

/// Polling interval for hosts without native `hashchange` events.
pub const CHECK_HASH_DELAY_MS: u32 = 100;

// =============================================================================
// Package Configuration
// =============================================================================

/// Keyword that moves a package into the low-level listing.
pub const LOW_LEVEL_KEYWORD: &str = "jetpack-low-level";

/// Suffix of module source files under a package's `lib` roots.
pub const MODULE_SUFFIX: &str = ".js";

/// Package readme, relative to the package root.
pub const README_FILE: &str = "README.md";

// =============================================================================
// Network Configuration
// =============================================================================

/// Package index, fetched once at startup.
pub const PACKAGE_INDEX_URL: &str = "packages/index.json";

/// Root of per-package files.
pub const PACKAGES_ROOT: &str = "packages";

/// Root of developer guide markdown.
pub const GUIDE_ROOT: &str = "md/dev-guide";

/// Liveness endpoint (long poll).
pub const IDLE_URL: &str = "api/idle";

/// Fetch request timeout in milliseconds.
pub const FETCH_TIMEOUT_MS: i32 = 10000;

/// Heartbeat ping spacing, and the quiet window a ping needs to count as healthy.
pub const IDLE_PING_DELAY_MS: u32 = 500;

// =============================================================================
// Animation Configuration
// =============================================================================

/// Render animation timing (milliseconds).
pub mod animation {
    /// Fade-out before the content swap.
    pub const FADE_OUT_MS: u32 = 100;
    /// Scroll-to-top polling interval.
    pub const SCROLL_TICK_MS: u32 = 10;
    /// Minimum pixels scrolled per tick.
    pub const SCROLL_MIN_STEP: f64 = 10.0;
}

// =============================================================================
// DOM Anchors
// =============================================================================

/// Element ids the render pipeline post-processes after a swap.
pub mod dom_ids {
    /// Mount point for the application.
    pub const APP: &str = "app";
    /// Container holding the visible document.
    pub const RIGHT_COLUMN: &str = "right-column";
    /// Column receiving `.aside` annotations.
    pub const SIDENOTES: &str = "sidenotes";
}

// =============================================================================
// UI Configuration
// =============================================================================

/// Icon theme selection.
///
/// Available themes:
/// - `Bootstrap` - Familiar, slightly bolder (default)
/// - `Lucide` - Minimal, thin strokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum IconTheme {
    #[default]
    Bootstrap,
    Lucide,
}

/// Current icon theme used throughout the application.
pub const ICON_THEME: IconTheme = IconTheme::Bootstrap;
